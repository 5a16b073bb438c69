//! Register images for timer-based quadrature counters.

bitfield::bitfield! {
    /// TXCTL
    ///
    /// Timer clock and enable control
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct TimerControlRegister(u32);
    impl Debug;
    u8;
    /// Clock prescaler, divide by `2^ps`
    pub ps, set_ps: 6, 4;
    /// Clock source select
    ///
    /// - `0` = PCLK
    /// - `1` = ACLK
    pub cs, set_cs: 3, 2;
}

bitfield::bitfield! {
    /// QEPCTL
    ///
    /// Quadrature decoder control; the upper half holds the tick counter
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct QepControlRegister(u32);
    impl Debug;
    u8;
    /// Current tick count
    pub u16, ticks, _: 31, 16;
    /// Phase B edge interrupt enable
    pub phbie, set_phbie: 11;
    /// Phase A edge interrupt enable
    pub phaie, set_phaie: 10;
    /// Direction change interrupt enable
    pub dirie, set_dirie: 9;
    /// Index event interrupt enable
    pub idxevie, set_idxevie: 8;
    /// Reset the counter on the index pulse
    pub idxrst, set_idxrst: 3;
    /// Count on both phase A and phase B
    pub cntab, set_cntab: 2;
    /// Count on rising and falling edges
    pub cntedge, set_cntedge: 1;
    /// Quadrature decoder enable
    pub qepen, set_qepen: 0;
}

impl TimerControlRegister {
    /// Image from a raw register value
    #[must_use]
    pub const fn from_bits(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw register value
    #[must_use]
    pub const fn bits(&self) -> u32 {
        self.0
    }
}

impl QepControlRegister {
    /// Image from a raw register value
    #[must_use]
    pub const fn from_bits(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw register value
    #[must_use]
    pub const fn bits(&self) -> u32 {
        self.0
    }
}
