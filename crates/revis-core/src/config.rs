//! Geometry and color configuration.

/// Which editor color theme an image is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeName {
    /// Light editor themes.
    Light,
    /// Dark editor themes.
    Dark,
}

impl ThemeName {
    /// Both themes, in rendering order.
    pub const ALL: [ThemeName; 2] = [ThemeName::Dark, ThemeName::Light];
}

/// Colors for one theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTheme {
    /// The conflicting / erroneous point.
    pub error: String,
    /// Regions and primary information.
    pub info: String,
    /// Secondary information (e.g. where a value was moved).
    pub info2: String,
    /// Tip text.
    pub tip: String,
}

/// Light + dark palettes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    /// Palette used for light themes.
    pub light: ColorTheme,
    /// Palette used for dark themes.
    pub dark: ColorTheme,
}

impl Palette {
    /// Colors for `theme`.
    pub fn theme(&self, theme: ThemeName) -> &ColorTheme {
        match theme {
            ThemeName::Light => &self.light,
            ThemeName::Dark => &self.dark,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        // Token colors of the default VS Code themes (error-token, info-token, debug-token,
        // entity.name.label).
        Self {
            light: ColorTheme {
                error: "#CD3131".to_string(),
                info: "#316BCD".to_string(),
                info2: "#800080".to_string(),
                tip: "#000000".to_string(),
            },
            dark: ColorTheme {
                error: "#F44747".to_string(),
                info: "#6796E6".to_string(),
                info2: "#B267E6".to_string(),
                tip: "#C8C8C8".to_string(),
            },
        }
    }
}

/// Font-size-derived drawing parameters.
///
/// Computed once when a session starts; later font size changes in the host are not picked up.
#[derive(Debug, Clone, PartialEq)]
pub struct VizConfig {
    /// Editor font size in px.
    pub font_size: f64,
    /// Width of one monospace character cell in px.
    pub char_width: f64,
    /// Height of one editor line in px.
    pub line_height: f64,
    /// Length of arrowhead strokes in px.
    pub arrow_size: f64,
    /// Theme colors.
    pub palette: Palette,
}

impl VizConfig {
    /// Default editor font size.
    pub const DEFAULT_FONT_SIZE: f64 = 14.0;

    /// Derive the configuration for an editor font size.
    pub fn from_font_size(font_size: f64) -> Self {
        Self {
            font_size,
            char_width: 9.0,
            line_height: (1.35 * font_size).round().max(8.0),
            arrow_size: 6.0,
            palette: Palette::default(),
        }
    }

    /// Colors for `theme`.
    pub fn colors(&self, theme: ThemeName) -> &ColorTheme {
        self.palette.theme(theme)
    }
}

impl Default for VizConfig {
    fn default() -> Self {
        Self::from_font_size(Self::DEFAULT_FONT_SIZE)
    }
}
