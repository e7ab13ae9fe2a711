/// A plain 24-bit color, converted to the front end's own color type at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn hex(value: u32) -> Self {
        Rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }
}

/// The color tuple applied uniformly to every rendered element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub bg: Rgb,
    pub card_bg: Rgb,
    pub text: Rgb,
    pub subtext: Rgb,
    pub border: Rgb,
    pub header_bg: Rgb,
    pub dark: bool,
}

pub const DARK: Theme = Theme {
    bg: Rgb::hex(0x000000),
    card_bg: Rgb::hex(0x1a1a1a),
    text: Rgb::hex(0xffffff),
    subtext: Rgb::hex(0x8e8e93),
    border: Rgb::hex(0x2a2a2a),
    header_bg: Rgb::hex(0x0d0d0d),
    dark: true,
};

pub const LIGHT: Theme = Theme {
    bg: Rgb::hex(0xf2f2f7),
    card_bg: Rgb::hex(0xffffff),
    text: Rgb::hex(0x000000),
    subtext: Rgb::hex(0x6e6e73),
    border: Rgb::hex(0xd1d1d6),
    header_bg: Rgb::hex(0xffffff),
    dark: false,
};

impl Theme {
    pub fn for_dark_mode(dark_mode: bool) -> &'static Theme {
        if dark_mode {
            &DARK
        } else {
            &LIGHT
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        DARK
    }
}
