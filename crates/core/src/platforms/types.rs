use serde::Serialize;

/// A streaming platform a user can subscribe to.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Platform {
    pub id: i64,
    pub name: String,
    pub icon: String,
    pub color: String,
    /// Provider watch-provider id used to translate availability.
    #[serde(skip)]
    pub provider_id: u32,
}

/// A platform with the user's selection flag.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserPlatform {
    #[serde(flatten)]
    pub platform: Platform,
    pub selected: bool,
}

/// Reference row inserted when the schema is created.
pub struct SeedPlatform {
    pub id: i64,
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub provider_id: u32,
}

pub const SEED_PLATFORMS: &[SeedPlatform] = &[
    SeedPlatform {
        id: 1,
        name: "Netflix",
        icon: "netflix",
        color: "#E50914",
        provider_id: 8,
    },
    SeedPlatform {
        id: 2,
        name: "Prime Video",
        icon: "prime-video",
        color: "#00A8E1",
        provider_id: 9,
    },
    SeedPlatform {
        id: 3,
        name: "Disney+",
        icon: "disney-plus",
        color: "#113CCF",
        provider_id: 337,
    },
    SeedPlatform {
        id: 4,
        name: "HBO Max",
        icon: "hbo-max",
        color: "#5822B4",
        provider_id: 1899,
    },
    SeedPlatform {
        id: 5,
        name: "Hulu",
        icon: "hulu",
        color: "#1CE783",
        provider_id: 15,
    },
    SeedPlatform {
        id: 6,
        name: "Paramount+",
        icon: "paramount-plus",
        color: "#0064FF",
        provider_id: 531,
    },
    SeedPlatform {
        id: 7,
        name: "Apple TV+",
        icon: "apple-tv-plus",
        color: "#000000",
        provider_id: 350,
    },
];
