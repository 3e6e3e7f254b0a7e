pub mod animation;
pub mod input;
pub mod math;
pub mod time;
pub mod units;

pub use animation::{SheetError, SpriteSheet, SpriteSheetRegistry};
pub use input::{InputSource, InputState, Key, NullInput};
pub use time::TimeState;
