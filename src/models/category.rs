use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! labelled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $($label => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

labelled_enum!(
    /// Part of the day a ride started in
    TimeOfDay {
        Morning => "Morning",
        Afternoon => "Afternoon",
        Evening => "Evening",
        Night => "Night",
    }
);

labelled_enum!(
    /// Hourly precipitation intensity
    PrecipitationLevel {
        No => "No",
        Light => "Light",
        Moderate => "Moderate",
        Heavy => "Heavy",
        Violent => "Violent",
    }
);

labelled_enum!(
    /// Beaufort-style wind force
    WindLevel {
        Calm => "Calm",
        Light => "Light",
        Moderate => "Moderate",
        Fresh => "Fresh",
        Strong => "Strong",
        NearGale => "Near Gale",
        Gale => "Gale",
        StrongGale => "Strong Gale",
        Storm => "Storm",
        ViolentStorm => "Violent Storm",
    }
);

labelled_enum!(
    TemperatureLevel {
        ExtremeCold => "Extreme Cold",
        VeryCold => "Very Cold",
        Cold => "Cold",
        Cool => "Cool",
        Mild => "Mild",
        Warm => "Warm",
        Hot => "Hot",
        VeryHot => "Very Hot",
    }
);

labelled_enum!(
    /// Cloud cover expressed in okta-like bands
    CloudCoverLevel {
        No => "No",
        Few => "Few",
        Isolated => "Isolated",
        Scattered => "Scattered",
        Broken => "Broken",
        Overcast => "Overcast",
    }
);
