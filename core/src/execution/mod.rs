pub mod history;

pub use self::history::{AugmentationHistory, AugmentationRecord};
