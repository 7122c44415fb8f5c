pub mod config;
pub mod constants;
pub mod error;
pub mod grid;
pub mod outcome;
pub mod resolver;
pub mod rng;
pub mod round;
pub mod topology;
pub mod types;

pub use config::{ConfigError, LadderConfig, Viewport};
pub use error::LadderError;
pub use grid::CoordinateGrid;
pub use outcome::{assign_outcomes, Labeling};
pub use resolver::{final_lanes, trace};
pub use rng::{RandomSource, Rng, SystemRandom};
pub use round::GameRound;
pub use topology::{generate, Topology};
