//! Priority compositing of the six object colors over the background

/// What each object produced on one visible color clock
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectColors {
    pub playfield: Option<u8>,
    pub ball: Option<u8>,
    pub player0: Option<u8>,
    pub player1: Option<u8>,
    pub missile0: Option<u8>,
    pub missile1: Option<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct Compositor {
    background_color: u8,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background_color(&self) -> u8 {
        self.background_color
    }

    pub fn set_background_color(&mut self, val: u8) {
        self.background_color = val;
    }

    /// Candidates are laid down lowest priority first; the last present one
    /// wins. With playfield priority the playfield and ball cover everything,
    /// otherwise player 0 and missile 0 are on top.
    pub fn resolve(&self, playfield_priority: bool, colors: &ObjectColors) -> u8 {
        let order = if playfield_priority {
            [
                colors.player1,
                colors.missile1,
                colors.player0,
                colors.missile0,
                colors.playfield,
                colors.ball,
            ]
        } else {
            [
                colors.playfield,
                colors.ball,
                colors.player1,
                colors.missile1,
                colors.player0,
                colors.missile0,
            ]
        };
        order
            .into_iter()
            .flatten()
            .last()
            .unwrap_or(self.background_color)
    }
}
