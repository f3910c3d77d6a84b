//! Built-in catalog used before the API answers and to enrich API records.
//!
//! Derived fields (stock, brand, rating, store split) come from fixed cyclic
//! patterns indexed by the seed position, so the same build always produces
//! the same catalog.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::products::{Category, Level, Product, SportOption};
use crate::text::Language;

const STOCK_PATTERN: [u32; 19] = [0, 12, 6, 20, 3, 0, 8, 14, 5, 2, 0, 11, 9, 4, 1, 0, 7, 15, 10];
const BRANDS: [&str; 7] = [
    "Aptonia", "Kalenji", "Kipsta", "Domyos", "Artengo", "Btwin", "Nabaiji",
];
const DELIVERY_PATTERN: [u8; 8] = [1, 2, 3, 2, 4, 1, 3, 2];
const REVIEW_PATTERN: [u32; 10] = [18, 42, 65, 27, 103, 11, 54, 89, 34, 22];
/// Ratings in tenths of a star.
const RATING_PATTERN: [u8; 8] = [46, 44, 48, 43, 47, 41, 45, 42];
const WARRANTY_PATTERN: [u8; 5] = [12, 24, 12, 24, 36];
const STORES: [&str; 4] = [
    "Decathlon Lille",
    "Decathlon Paris Madeleine",
    "Decathlon Lyon Part-Dieu",
    "Decathlon Bordeaux Lac",
];
const IMAGES_PER_PRODUCT: usize = 2;

struct Seed {
    id: &'static str,
    category: Category,
    sports: &'static [&'static str],
    levels: &'static [Level],
    name: &'static str,
    description: &'static str,
    /// Price in cents.
    cents: i64,
}

use Level::{Average, Beginner, Expert};

const SEEDS: &[Seed] = &[
    Seed {
        id: "p-bad-001",
        category: Category::Footwear,
        sports: &["BADMINTON"],
        levels: &[Beginner, Average, Expert],
        name: "Chaussures badminton court grip 900",
        description: "Chaussure indoor stable et legere pour les changements de direction rapides sur terrain.",
        cents: 8499,
    },
    Seed {
        id: "p-bad-002",
        category: Category::Equipment,
        sports: &["BADMINTON"],
        levels: &[Average, Expert],
        name: "Raquette badminton power strike 78",
        description: "Raquette equilibree orientee puissance, ideale pour un jeu offensif et des smashs repetes.",
        cents: 6999,
    },
    Seed {
        id: "p-run-001",
        category: Category::Footwear,
        sports: &["RUNNING"],
        levels: &[Beginner, Average],
        name: "Chaussures running comfort run 500",
        description: "Amorti souple pour les sorties regulieres sur route avec un bon maintien du pied.",
        cents: 5999,
    },
    Seed {
        id: "p-run-002",
        category: Category::Apparel,
        sports: &["RUNNING"],
        levels: &[Beginner, Average, Expert],
        name: "Veste running coupe-vent dry pace",
        description: "Veste respirante et deperlante pour courir par temps frais ou vent modere.",
        cents: 4499,
    },
    Seed {
        id: "p-foot-001",
        category: Category::Equipment,
        sports: &["FOOTBALL"],
        levels: &[Beginner, Average, Expert],
        name: "Ballon football match team pro",
        description: "Ballon cousu machine avec toucher regulier et bonne resistance a l'usure.",
        cents: 2999,
    },
    Seed {
        id: "p-foot-002",
        category: Category::Protection,
        sports: &["FOOTBALL"],
        levels: &[Average, Expert],
        name: "Protege-tibias shield flex",
        description: "Protection legere avec coque flexible et manchette textile pour un confort durable.",
        cents: 1999,
    },
    Seed {
        id: "p-ten-001",
        category: Category::Equipment,
        sports: &["TENNIS"],
        levels: &[Beginner, Average],
        name: "Raquette tennis control spin 102",
        description: "Raquette maniable pour progresser, favorise le controle de balle et les effets.",
        cents: 8999,
    },
    Seed {
        id: "p-ten-002",
        category: Category::Accessories,
        sports: &["TENNIS"],
        levels: &[Average, Expert],
        name: "Sac tennis competition 9 raquettes",
        description: "Grand compartiment isotherme pour transporter raquettes, textiles et accessoires.",
        cents: 6499,
    },
    Seed {
        id: "p-cyc-001",
        category: Category::Equipment,
        sports: &["CYCLISME"],
        levels: &[Beginner, Average, Expert],
        name: "Casque velo route safe ride 300",
        description: "Casque aeroventile ajuste avec molette arriere pour les sorties route et velotaf.",
        cents: 3999,
    },
    Seed {
        id: "p-cyc-002",
        category: Category::Accessories,
        sports: &["CYCLISME"],
        levels: &[Beginner, Average],
        name: "Eclairage velo avant/arriere usb",
        description: "Kit d'eclairage rechargeable pour etre visible en ville et sur pistes cyclables.",
        cents: 2499,
    },
    Seed {
        id: "p-mus-001",
        category: Category::Equipment,
        sports: &["MUSCULATION"],
        levels: &[Beginner, Average, Expert],
        name: "Halteres ajustables home set 20kg",
        description: "Jeu d'halteres modulables pour entrainements a domicile, progression par paliers.",
        cents: 11999,
    },
    Seed {
        id: "p-mus-002",
        category: Category::Accessories,
        sports: &["MUSCULATION"],
        levels: &[Average, Expert],
        name: "Ceinture de force power support",
        description: "Ceinture de maintien lombaire pour les exercices de souleve et squat charges.",
        cents: 3499,
    },
    Seed {
        id: "p-nat-001",
        category: Category::Equipment,
        sports: &["NATATION"],
        levels: &[Beginner, Average],
        name: "Lunettes natation clear vision",
        description: "Lunettes anti-buee avec joint souple pour un confort longue duree en piscine.",
        cents: 1499,
    },
    Seed {
        id: "p-nat-002",
        category: Category::Apparel,
        sports: &["NATATION"],
        levels: &[Average, Expert],
        name: "Maillot natation training one-piece",
        description: "Maillot resistant au chlore, coupe ergonomique pour entrainements frequents.",
        cents: 2799,
    },
    Seed {
        id: "p-rand-001",
        category: Category::Footwear,
        sports: &["RANDONNEE"],
        levels: &[Beginner, Average, Expert],
        name: "Chaussures randonnee mid trek 100",
        description: "Tige montante pour maintenir la cheville, semelle adherente sur sentiers mixtes.",
        cents: 7499,
    },
    Seed {
        id: "p-rand-002",
        category: Category::Accessories,
        sports: &["RANDONNEE"],
        levels: &[Beginner, Average],
        name: "Sac a dos randonnee 25L breathe",
        description: "Sac compact avec dos ventile et poches acces rapide pour sorties a la journee.",
        cents: 4999,
    },
    Seed {
        id: "p-bas-001",
        category: Category::Footwear,
        sports: &["BASKETBALL"],
        levels: &[Average, Expert],
        name: "Chaussures basketball jump elite 700",
        description: "Amorti dynamique et maintien lateral renforce pour les appuis explosifs.",
        cents: 9499,
    },
    Seed {
        id: "p-yog-001",
        category: Category::Equipment,
        sports: &["YOGA"],
        levels: &[Beginner, Average, Expert],
        name: "Tapis yoga confort align 6mm",
        description: "Tapis antiderapant avec bonne densite pour postures d'equilibre et seances au sol.",
        cents: 2299,
    },
    Seed {
        id: "p-yog-002",
        category: Category::Accessories,
        sports: &["YOGA"],
        levels: &[Beginner, Average],
        name: "Sangle yoga stretch assist",
        description: "Sangle reglable pour travailler la mobilite et progresser sur les amplitudes.",
        cents: 999,
    },
];

/// Seed-only information shown on the product detail view.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetails {
    pub brand: &'static str,
    /// `REF-<ID>`, e.g. `"REF-P-RUN-001"`.
    pub sku: String,
    /// Average rating in tenths of a star (`46` = 4.6).
    pub rating_tenths: u8,
    pub review_count: u32,
    pub warranty_months: u8,
    pub delivery_days: u8,
    pub features: [&'static str; 3],
    pub stock_by_store: Vec<(&'static str, u32)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeedEntry {
    pub product: Product,
    pub details: ProductDetails,
}

/// The local catalog, indexed by product id.
#[derive(Debug, Clone)]
pub struct SeedCatalog {
    entries: Vec<SeedEntry>,
    index: HashMap<String, usize>,
}

impl SeedCatalog {
    /// Builds the standard catalog shipped with the client.
    #[must_use]
    pub fn standard() -> Self {
        let entries: Vec<SeedEntry> = SEEDS
            .iter()
            .enumerate()
            .map(|(i, seed)| build_entry(i, seed))
            .collect();
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.product.id.clone(), i))
            .collect();
        Self { entries, index }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SeedEntry> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    #[must_use]
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.get(id).map(|e| &e.product)
    }

    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.entries.iter().map(|e| e.product.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct sports of the catalog, sorted by French display name. Used
    /// until the sports endpoint answers.
    #[must_use]
    pub fn sport_options(&self) -> Vec<SportOption> {
        let mut keys: Vec<&str> = Vec::new();
        for entry in &self.entries {
            for sport in &entry.product.sports {
                if !keys.contains(&sport.as_str()) {
                    keys.push(sport);
                }
            }
        }
        let mut options: Vec<SportOption> =
            keys.into_iter().map(|k| SportOption::new(k, k)).collect();
        options.sort_by(|a, b| Language::Fr.collate(&a.display_name, &b.display_name));
        options
    }
}

fn build_entry(index: usize, seed: &Seed) -> SeedEntry {
    let stock_count = STOCK_PATTERN[index % STOCK_PATTERN.len()];
    let split = split_stock(stock_count, STORES.len(), index);

    let product = Product {
        id: seed.id.to_owned(),
        category: seed.category,
        sports: seed.sports.iter().map(|s| (*s).to_owned()).collect(),
        levels: seed.levels.to_vec(),
        name: seed.name.to_owned(),
        description: seed.description.to_owned(),
        price: Decimal::new(seed.cents, 2),
        images: (1..=IMAGES_PER_PRODUCT)
            .map(|n| format!("/assets/products/{}-{n}.png", seed.id))
            .collect(),
        stock_count: Some(stock_count),
    };

    let details = ProductDetails {
        brand: BRANDS[index % BRANDS.len()],
        sku: format!("REF-{}", seed.id.to_uppercase()),
        rating_tenths: RATING_PATTERN[index % RATING_PATTERN.len()],
        review_count: REVIEW_PATTERN[index % REVIEW_PATTERN.len()],
        warranty_months: WARRANTY_PATTERN[index % WARRANTY_PATTERN.len()],
        delivery_days: DELIVERY_PATTERN[index % DELIVERY_PATTERN.len()],
        features: seed.category.features(),
        stock_by_store: STORES.iter().copied().zip(split).collect(),
    };

    SeedEntry { product, details }
}

/// Deals `total` units round-robin over `parts` stores, starting at store
/// `seed % parts`.
fn split_stock(total: u32, parts: usize, seed: usize) -> Vec<u32> {
    let mut distribution = vec![0u32; parts];
    if parts == 0 {
        return distribution;
    }
    for unit in 0..total as usize {
        distribution[(seed + unit) % parts] += 1;
    }
    distribution
}
