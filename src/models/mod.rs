pub mod location;
pub mod observation;
pub mod time;

pub use location::*;
pub use observation::*;
pub use time::*;
