//! Static catalog and marketing copy.
//!
//! Everything here is compiled in. Products are looked up by slug from the
//! cart and product routes; the rest feeds the marketing templates.

use std::sync::LazyLock;

use wzzptom_core::{CurrencyCode, Price, Product, ProductCategory, ProductId};

/// Sound kits for sale.
pub static PRODUCTS: LazyLock<Vec<Product>> = LazyLock::new(|| {
    vec![
        Product {
            id: ProductId::new("autumn-v1"),
            name: "AUTUMN COLLECTION V1".to_string(),
            category: ProductCategory::SampleKit,
            price: Price::from_cents(4999, CurrencyCode::EUR),
            description: "The definitive collection for the season. Dark, moody, and intricate \
                          melodies inspired by the changing weather."
                .to_string(),
            image: "https://payhip.com/cdn-cgi/image/format=auto/https://pe56d.s3.amazonaws.com/o_1jatonpv9ahau3gi7m1e7s69p1a.png"
                .to_string(),
            features: to_strings(&[
                "14 Original Loops",
                "+130 Stems Included (WAV)",
                "More Than 2GB Of Sounds",
                "BPM & Key Labelled",
                "Send labs to an apposite mail",
                "100% Royalty Free for Independent Releases",
            ]),
        },
        Product {
            id: ProductId::new("warmcode-v1"),
            name: "WARMCODE PRODUCTION SUITE".to_string(),
            category: ProductCategory::SampleKit,
            price: Price::from_cents(4700, CurrencyCode::EUR),
            description: "BUILT TO REPLACE EVERY COLD, STERILE SOUND FOLDER YOU\u{2019}VE BEEN \
                          SETTLING FOR. Over 6 months of analog processing and sound design."
                .to_string(),
            image: "https://images.unsplash.com/photo-1558591710-4b4a1ae0f04d?q=80&w=2574&auto=format&fit=crop"
                .to_string(),
            features: to_strings(&[
                "6 Exclusive Kits",
                "3,000+ Analog One-Shots",
                "Live Recorded Percussion",
                "MIDI Vault & Templates",
                "12hr Production Masterclass",
            ]),
        },
    ]
});

/// Look up a product by slug.
#[must_use]
pub fn find_product(id: &str) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.id.as_str() == id)
}

// =============================================================================
// Marketing copy
// =============================================================================

pub const HERO_TITLE: &str = "WZZPTOM";
pub const HERO_KICKER: &str = "Sonic Architecture \u{2022} Billboard Charting";
pub const HERO_TAGLINE: &str = "High-end textures for the modern landscape.";
pub const HERO_TRUSTED_BY: &str = "Lil Baby \u{2022} Roddy Ricch \u{2022} 42 Dugg";

/// Scrolling banner under the hero.
pub const TICKER: &[&str] = &[
    "BILLBOARD CHARTING PRODUCER",
    "INSTANT DELIVERY",
    "SECURE CHECKOUT",
    "HIGH QUALITY INDUSTRY LEVEL",
    "100% ROYALTY FREE OPTIONS",
    "CUSTOM PRODUCTION",
];

/// A released track the producer worked on.
#[derive(Debug, Clone, Copy)]
pub struct Credit {
    pub title: &'static str,
    pub artist: &'static str,
    /// "Single", "Album", ...
    pub release_type: &'static str,
    pub image: &'static str,
    pub link: &'static str,
    pub platform: &'static str,
}

pub const CREDITS: &[Credit] = &[
    Credit {
        title: "Try To Love",
        artist: "Lil Baby",
        release_type: "Single",
        image: "https://i.scdn.co/image/ab67616d0000b273c9a3d018d8b23b380606e709",
        link: "https://open.spotify.com/intl-it/track/78qVD9sN4z5xuBstCJ6RF2?si=3eabbce5c9094127",
        platform: "Spotify",
    },
    Credit {
        title: "When I'll Win",
        artist: "Noodah05 ft. Lil Baby",
        release_type: "Album",
        image: "https://is1-ssl.mzstatic.com/image/thumb/Music221/v4/e9/b0/4d/e9b04d35-a79a-9e5c-1790-371a83ff6478/artwork.jpg/600x600bf-60.jpg",
        link: "https://music.apple.com/it/album/when-ill-win-feat-lil-baby/1842385086?i=1842385091",
        platform: "Apple Music",
    },
];

pub const DISCOGRAPHY_URL: &str = "https://genius.com/artists/Wzzptom";

/// Value proposition cards on the home page.
#[derive(Debug, Clone, Copy)]
pub struct ValuePoint {
    pub title: &'static str,
    pub description: &'static str,
}

pub const VALUE_POINTS: &[ValuePoint] = &[
    ValuePoint {
        title: "Major Protocol",
        description: "Mixed & mastered to major label loudness standards.",
    },
    ValuePoint {
        title: "Analog Flow",
        description: "Processed through Neve preamps and vintage tube circuitry.",
    },
    ValuePoint {
        title: "Seamless Sync",
        description: "Drag and drop formatted for immediate workflow.",
    },
];

pub const ABOUT_KICKER: &str = "The Visionary Behind the Sound";
pub const ABOUT_BODY: &str = "Rooted in classical piano and guitar, I bridge the gap between \
    organic composition and modern synthesis. Every placement is a result of obsessive sound design.";
pub const ABOUT_QUOTE: &str = "I don't just provide beats; I design sonic atmospheres that \
    define the next generation of trap and R&B.";
pub const YEARS_ACTIVE: u32 = 7;
pub const PLACEMENTS: u32 = 100;

/// A bookable production service.
#[derive(Debug, Clone, Copy)]
pub struct Service {
    pub title: &'static str,
    /// Display price; "Contact" means quote on request.
    pub price: &'static str,
    pub features: &'static [&'static str],
}

impl Service {
    /// Contact form link with the subject prefilled.
    #[must_use]
    pub fn booking_path(&self) -> String {
        format!("/contact?subject={}", urlencoding::encode(self.title))
    }
}

pub const SERVICES_INTRO: &str = "Take your sound to the next level. Professional engineering \
    and production services tailored to major label standards.";

pub const SERVICES: &[Service] = &[
    Service {
        title: "Mixing & Mastering",
        price: "Contact",
        features: &[
            "High Quality Industry Level Loudness",
            "Vocal Correction (Auto-Tune)",
            "Analog Processing",
            "48h Turnaround",
            "3 Revisions",
        ],
    },
    Service {
        title: "Custom Beat",
        price: "\u{20ac}500",
        features: &[
            "Custom vibes",
            "Tailored to your style",
            "Unlimited Stems",
            "Mix included",
            "1-on-1 Consultation",
        ],
    },
    Service {
        title: "Executive Production",
        price: "Contact",
        features: &[
            "Full Project Oversight",
            "Recording Sessions",
            "Feature Arrangements",
            "Album Sequencing",
            "Industry Guidance",
        ],
    },
];

#[derive(Debug, Clone, Copy)]
pub struct FaqEntry {
    pub question: &'static str,
    pub answer: &'static str,
}

pub const FAQ: &[FaqEntry] = &[
    FaqEntry {
        question: "Are the samples royalty free?",
        answer: "Yes, for independent releases (under 1 million streams). For major label \
                 placements, clearance must be negotiated. All drum kits are 100% royalty free.",
    },
    FaqEntry {
        question: "How do I receive my files?",
        answer: "Payhip will make the download available immediately after purchase. You will \
                 also receive an email with the download link.",
    },
    FaqEntry {
        question: "What DAW do these work in?",
        answer: "All files are universal WAV format and work in FL Studio, Ableton, Logic Pro, \
                 Pro Tools, and any other DAW.",
    },
    FaqEntry {
        question: "Can I get a refund?",
        answer: "Due to the digital nature of the products, all sales are final. If you have a \
                 corrupted file, contact support for a replacement.",
    },
];

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
