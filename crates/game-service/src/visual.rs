//! Ship visual generator
//!
//! Random sprite index and colours used by the client to tint ship sprites.
//! The hangar and the bazaar use the same generator with different profiles.

use rand::Rng;

/// An RGB triple
pub type Rgb = [u8; 3];

/// How the colour list of a visual is produced
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Palette {
    /// One random base colour followed by a shadow `offset` darker per
    /// channel, floored at 0
    Shadowed { offset: u8 },
    /// `count` independent random colours
    Independent { count: usize },
}

/// Ranges for one generator variant
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisualProfile {
    /// Sprites are numbered `0..sprite_count`
    pub sprite_count: u8,
    /// Inclusive channel range for random colours
    pub channel_min: u8,
    pub channel_max: u8,
    pub palette: Palette,
}

impl VisualProfile {
    /// Hangar ships: 2 sprites, bright base colour plus shadow
    pub const HANGAR: VisualProfile = VisualProfile {
        sprite_count: 2,
        channel_min: 50,
        channel_max: 255,
        palette: Palette::Shadowed { offset: 80 },
    };

    /// Bazaar ships: 5 sprites, light/mid/dark colours
    pub const BAZAAR: VisualProfile = VisualProfile {
        sprite_count: 5,
        channel_min: 0,
        channel_max: 255,
        palette: Palette::Independent { count: 3 },
    };

    pub fn generate<R: Rng>(&self, rng: &mut R) -> ShipVisual {
        let sprite_id = rng.gen_range(0..self.sprite_count.max(1));

        let colors = match self.palette {
            Palette::Shadowed { offset } => {
                let base = self.random_color(rng);
                let shadow = base.map(|channel| channel.saturating_sub(offset));
                vec![base, shadow]
            }
            Palette::Independent { count } => (0..count).map(|_| self.random_color(rng)).collect(),
        };

        ShipVisual { sprite_id, colors }
    }

    fn random_color<R: Rng>(&self, rng: &mut R) -> Rgb {
        let (min, max) = (self.channel_min, self.channel_max.max(self.channel_min));
        [
            rng.gen_range(min..=max),
            rng.gen_range(min..=max),
            rng.gen_range(min..=max),
        ]
    }
}

/// Generated sprite parameters
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShipVisual {
    pub sprite_id: u8,
    /// Colours in palette order
    pub colors: Vec<Rgb>,
}

impl ShipVisual {
    pub fn color(&self, index: usize) -> Rgb {
        self.colors.get(index).copied().unwrap_or_default()
    }
}
