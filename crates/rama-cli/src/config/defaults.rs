pub struct DefaultsConfig {
    pub filter: &'static str,
    pub strict_alignment: bool,
    pub output: &'static str,
    pub width: u32,
    pub height: u32,
    pub contour_blur: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            filter: "all",
            strict_alignment: false,
            output: "ramachandran.svg",
            width: 800,
            height: 800,
            contour_blur: 2.0,
        }
    }
}
