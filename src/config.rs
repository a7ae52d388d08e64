use std::time::Duration;

pub const DEFAULT_WIDTH: usize = 10;
pub const DEFAULT_HEIGHT: usize = 20;
pub const DEFAULT_TICK_MS: u64 = 1000;

/// Narrowest field that still fits the I piece lying flat.
pub const MIN_WIDTH: usize = 4;
pub const MIN_HEIGHT: usize = 4;

/// Upper bounds keep every cell coordinate inside `i16` and the rendered
/// field inside a `u16` terminal extent.
pub const MAX_WIDTH: usize = 256;
pub const MAX_HEIGHT: usize = 256;

/// Session constants, fixed once a game is constructed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub tick_interval: Duration,
}

#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("field width {0} is below the minimum of {MIN_WIDTH}")]
    FieldTooNarrow(usize),
    #[error("field width {0} is above the maximum of {MAX_WIDTH}")]
    FieldTooWide(usize),
    #[error("field height {0} is below the minimum of {MIN_HEIGHT}")]
    FieldTooShort(usize),
    #[error("field height {0} is above the maximum of {MAX_HEIGHT}")]
    FieldTooTall(usize),
    #[error("tick interval must be non-zero")]
    ZeroTickInterval,
}

impl GameConfig {
    pub fn new(width: usize, height: usize, tick_interval: Duration) -> Result<Self, ConfigError> {
        let config = Self {
            width,
            height,
            tick_interval,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MIN_WIDTH {
            return Err(ConfigError::FieldTooNarrow(self.width));
        }
        if self.width > MAX_WIDTH {
            return Err(ConfigError::FieldTooWide(self.width));
        }
        if self.height < MIN_HEIGHT {
            return Err(ConfigError::FieldTooShort(self.height));
        }
        if self.height > MAX_HEIGHT {
            return Err(ConfigError::FieldTooTall(self.height));
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
        }
    }
}
