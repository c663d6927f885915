pub mod rulers;
pub mod zodiac;

pub use rulers::sign_ruler;
pub use zodiac::{degree_in_sign, Element, ZodiacSign};
