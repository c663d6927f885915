//! Sign rulers, traditional and modern.

use crate::ephemeris::Body;
use crate::western::zodiac::ZodiacSign;

const TRADITIONAL_RULERS: [Body; 12] = [
    Body::Mars,    // Aries
    Body::Venus,   // Taurus
    Body::Mercury, // Gemini
    Body::Moon,    // Cancer
    Body::Sun,     // Leo
    Body::Mercury, // Virgo
    Body::Venus,   // Libra
    Body::Mars,    // Scorpio
    Body::Jupiter, // Sagittarius
    Body::Saturn,  // Capricorn
    Body::Saturn,  // Aquarius
    Body::Jupiter, // Pisces
];

/// Ruler of a sign. Modern rulership gives Scorpio, Aquarius and Pisces to
/// the outer planets.
pub fn sign_ruler(sign: ZodiacSign, modern: bool) -> Body {
    if modern {
        match sign {
            ZodiacSign::Scorpio => return Body::Pluto,
            ZodiacSign::Aquarius => return Body::Uranus,
            ZodiacSign::Pisces => return Body::Neptune,
            _ => {}
        }
    }
    TRADITIONAL_RULERS[sign.index()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traditional_rulers() {
        assert_eq!(sign_ruler(ZodiacSign::Aries, false), Body::Mars);
        assert_eq!(sign_ruler(ZodiacSign::Cancer, false), Body::Moon);
        assert_eq!(sign_ruler(ZodiacSign::Leo, false), Body::Sun);
        assert_eq!(sign_ruler(ZodiacSign::Scorpio, false), Body::Mars);
    }

    #[test]
    fn modern_rulers() {
        assert_eq!(sign_ruler(ZodiacSign::Scorpio, true), Body::Pluto);
        assert_eq!(sign_ruler(ZodiacSign::Aquarius, true), Body::Uranus);
        assert_eq!(sign_ruler(ZodiacSign::Pisces, true), Body::Neptune);
        assert_eq!(sign_ruler(ZodiacSign::Capricorn, true), Body::Saturn);
    }
}
