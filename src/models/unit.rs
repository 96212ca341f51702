use std::fmt;

const METERS_PER_INCH: f64 = 0.0254;
const CENTIMETERS_PER_METER: f64 = 100.0;

/// Measurement unit selected on the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    #[default]
    Meters,
    Inches,
    Centimeters,
}

impl Unit {
    pub const ALL: [Unit; 3] = [Unit::Meters, Unit::Inches, Unit::Centimeters];

    /// Map a unit tag to a unit. Unknown tags are treated as meters.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "inches" => Unit::Inches,
            "centimeters" => Unit::Centimeters,
            _ => Unit::Meters,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Unit::Meters => "meters",
            Unit::Inches => "inches",
            Unit::Centimeters => "centimeters",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Unit::Meters => Unit::Inches,
            Unit::Inches => Unit::Centimeters,
            Unit::Centimeters => Unit::Meters,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Unit::Meters => Unit::Centimeters,
            Unit::Inches => Unit::Meters,
            Unit::Centimeters => Unit::Inches,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Convert a length in `unit` to meters
pub fn to_meters(value: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Inches => value * METERS_PER_INCH,
        Unit::Centimeters => value / CENTIMETERS_PER_METER,
        Unit::Meters => value,
    }
}
