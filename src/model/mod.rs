mod career;
mod lookup;

pub use career::*;
pub use lookup::*;
