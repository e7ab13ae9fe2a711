//! Mapping from raw post attributes to presentation bands
//!
//! Everything here is pure and infallible: unrecognized or missing inputs
//! degrade to an explicit "unknown" band instead of an error.

use crate::model::Post;
use crate::theme::{Rgb, Theme};

/// Scores strictly above this are high risk.
pub const HIGH_RISK_THRESHOLD: f64 = 75.0;
/// Scores strictly above this (and not high) are medium risk.
pub const MEDIUM_RISK_THRESHOLD: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagBand {
    Scam,
    Suspicious,
    Safe,
    Pending,
    Neutral,
}

impl FlagBand {
    /// Exact, case-sensitive match on the flag values the analyzer emits.
    pub fn from_flag(flag: &str) -> Self {
        match flag {
            "SCAM DETECTED" => FlagBand::Scam,
            "Suspicious" => FlagBand::Suspicious,
            "Safe" => FlagBand::Safe,
            "Pending" => FlagBand::Pending,
            _ => FlagBand::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlagBand::Scam => "scam",
            FlagBand::Suspicious => "suspicious",
            FlagBand::Safe => "safe",
            FlagBand::Pending => "pending",
            FlagBand::Neutral => "neutral",
        }
    }

    pub fn color(&self, theme: &Theme) -> Rgb {
        match (self, theme.dark) {
            (FlagBand::Scam, true) => Rgb::hex(0xff453a),
            (FlagBand::Scam, false) => Rgb::hex(0xd70015),
            (FlagBand::Suspicious, true) => Rgb::hex(0xff9f0a),
            (FlagBand::Suspicious, false) => Rgb::hex(0xc93400),
            (FlagBand::Safe, true) => Rgb::hex(0x30d158),
            (FlagBand::Safe, false) => Rgb::hex(0x248a3d),
            (FlagBand::Pending, true) => Rgb::hex(0x0a84ff),
            (FlagBand::Pending, false) => Rgb::hex(0x0040dd),
            (FlagBand::Neutral, _) => theme.subtext,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskBand {
    High,
    Medium,
    Low,
    Unknown,
}

impl RiskBand {
    /// Bands the raw score. Negative or missing scores mean "not analyzed".
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            Some(s) if s.is_nan() || s < 0.0 => RiskBand::Unknown,
            Some(s) if s > HIGH_RISK_THRESHOLD => RiskBand::High,
            Some(s) if s > MEDIUM_RISK_THRESHOLD => RiskBand::Medium,
            Some(_) => RiskBand::Low,
            None => RiskBand::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskBand::High => "high",
            RiskBand::Medium => "medium",
            RiskBand::Low => "low",
            RiskBand::Unknown => "N/A",
        }
    }

    pub fn color(&self, theme: &Theme) -> Rgb {
        match self {
            RiskBand::High => FlagBand::Scam.color(theme),
            RiskBand::Medium => FlagBand::Suspicious.color(theme),
            RiskBand::Low => FlagBand::Safe.color(theme),
            RiskBand::Unknown => theme.subtext,
        }
    }
}

/// Formats a raw score for display, or "N/A" when it carries no band.
pub fn format_risk_score(score: Option<f64>) -> String {
    match score {
        Some(s) if RiskBand::from_score(Some(s)) != RiskBand::Unknown => {
            if s.fract() == 0.0 {
                format!("{:.0}", s)
            } else {
                format!("{:.1}", s)
            }
        }
        _ => RiskBand::Unknown.as_str().to_string(),
    }
}

/// `Some("87.3%")` for a positive probability, `None` otherwise.
pub fn format_ai_probability(probability: Option<f64>) -> Option<String> {
    probability
        .filter(|p| *p > 0.0)
        .map(|p| format!("{:.1}%", p * 100.0))
}

/// Thousands-separated like count, e.g. `1200` -> `"1,200"`.
pub fn format_likes(likes: u64) -> String {
    let digits = likes.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Everything a front end needs to render one post card.
#[derive(Debug, Clone, PartialEq)]
pub struct PostPresentation {
    pub flag_band: FlagBand,
    pub flag_label: String,
    pub flag_color: Rgb,
    pub risk_band: RiskBand,
    pub risk_label: String,
    pub risk_color: Rgb,
    pub ai_probability: Option<String>,
    pub likes: Option<String>,
}

impl PostPresentation {
    pub fn new(post: &Post, theme: &Theme) -> Self {
        let flag_band = FlagBand::from_flag(&post.flag);
        let risk_band = RiskBand::from_score(post.risk_score);

        Self {
            flag_band,
            flag_label: post.flag.clone(),
            flag_color: flag_band.color(theme),
            risk_band,
            risk_label: format_risk_score(post.risk_score),
            risk_color: risk_band.color(theme),
            ai_probability: format_ai_probability(post.ai_image_probability),
            likes: post.likes.map(format_likes),
        }
    }
}
