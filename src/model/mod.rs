pub use user::*;
pub use video::*;

mod user;
mod video;
