//! Cosmetic skin shop
//!
//! A fixed catalog of actor colors bought with collected coins.
//! Purchases are permanent; there are no refunds.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::progress::Profile;
use crate::{Rgb, palette};

/// Actor color options
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skin {
    #[default]
    White,
    Red,
    Green,
    Blue,
    Purple,
    Gold,
    Cyan,
}

impl Skin {
    pub const ALL: [Skin; 7] = [
        Skin::White,
        Skin::Red,
        Skin::Green,
        Skin::Blue,
        Skin::Purple,
        Skin::Gold,
        Skin::Cyan,
    ];

    /// Stable identifier used in saves and by the UI
    pub fn id(&self) -> &'static str {
        match self {
            Skin::White => "white",
            Skin::Red => "red",
            Skin::Green => "green",
            Skin::Blue => "blue",
            Skin::Purple => "purple",
            Skin::Gold => "gold",
            Skin::Cyan => "cyan",
        }
    }

    pub fn from_id(s: &str) -> Option<Self> {
        Skin::ALL.into_iter().find(|skin| skin.id() == s.trim().to_lowercase())
    }

    pub fn color(&self) -> Rgb {
        match self {
            Skin::White => palette::WHITE,
            Skin::Red => palette::RED,
            Skin::Green => palette::GREEN,
            Skin::Blue => palette::BLUE,
            Skin::Purple => palette::PURPLE,
            Skin::Gold => palette::GOLD,
            Skin::Cyan => palette::CYAN,
        }
    }
}

impl fmt::Display for Skin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Why a shop request was refused. No state changes on any of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PurchaseError {
    #[error("unknown skin '{0}'")]
    InvalidSkin(String),
    #[error("skin {0} is already owned")]
    AlreadyOwned(Skin),
    #[error("skin costs {price} coins but only {balance} are available")]
    InsufficientFunds { price: u64, balance: u64 },
    #[error("skin {0} has not been purchased")]
    NotOwned(Skin),
}

/// Fixed skin -> price mapping
#[derive(Debug, Clone)]
pub struct ShopCatalog {
    entries: Vec<(Skin, u64)>,
}

impl Default for ShopCatalog {
    fn default() -> Self {
        Self {
            entries: vec![
                (Skin::White, 0),
                (Skin::Red, 100),
                (Skin::Green, 150),
                (Skin::Blue, 200),
                (Skin::Purple, 300),
                (Skin::Gold, 500),
                (Skin::Cyan, 750),
            ],
        }
    }
}

impl ShopCatalog {
    pub fn entries(&self) -> &[(Skin, u64)] {
        &self.entries
    }

    pub fn price(&self, skin: Skin) -> Option<u64> {
        self.entries.iter().find(|(s, _)| *s == skin).map(|(_, p)| *p)
    }

    fn lookup(&self, skin_id: &str) -> Result<(Skin, u64), PurchaseError> {
        Skin::from_id(skin_id)
            .and_then(|skin| self.price(skin).map(|price| (skin, price)))
            .ok_or_else(|| PurchaseError::InvalidSkin(skin_id.to_string()))
    }

    /// Buy and equip a skin. On success the price is deducted from the wallet.
    pub fn purchase(&self, profile: &mut Profile, skin_id: &str) -> Result<Skin, PurchaseError> {
        let (skin, price) = self.lookup(skin_id)?;
        if profile.owns(skin) {
            return Err(PurchaseError::AlreadyOwned(skin));
        }
        if profile.total_coins < price {
            return Err(PurchaseError::InsufficientFunds {
                price,
                balance: profile.total_coins,
            });
        }

        profile.total_coins -= price;
        profile.purchased_skins.insert(skin);
        profile.equipped_skin = skin;
        log::info!("Purchased skin {} for {} coins ({} left)", skin, price, profile.total_coins);
        Ok(skin)
    }

    /// Switch to a skin that is already owned
    pub fn equip(&self, profile: &mut Profile, skin_id: &str) -> Result<Skin, PurchaseError> {
        let (skin, _) = self.lookup(skin_id)?;
        if !profile.owns(skin) {
            return Err(PurchaseError::NotOwned(skin));
        }
        profile.equipped_skin = skin;
        Ok(skin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rich(coins: u64) -> Profile {
        Profile {
            total_coins: coins,
            ..Profile::default()
        }
    }

    #[test]
    fn test_skin_ids() {
        for skin in Skin::ALL {
            assert_eq!(Skin::from_id(skin.id()), Some(skin));
        }
        assert_eq!(Skin::from_id(" Gold "), Some(Skin::Gold));
        assert_eq!(Skin::from_id("plaid"), None);
    }

    #[test]
    fn test_insufficient_funds_changes_nothing() {
        let catalog = ShopCatalog::default();
        let mut profile = rich(300);
        let before = profile.clone();

        let result = catalog.purchase(&mut profile, "gold");
        assert_eq!(
            result,
            Err(PurchaseError::InsufficientFunds {
                price: 500,
                balance: 300
            })
        );
        assert_eq!(profile, before);
    }

    #[test]
    fn test_purchase_deducts_and_equips() {
        let catalog = ShopCatalog::default();
        let mut profile = rich(320);
        assert_eq!(catalog.purchase(&mut profile, "blue"), Ok(Skin::Blue));
        assert_eq!(profile.total_coins, 120);
        assert!(profile.purchased_skins.contains(&Skin::Blue));
        assert_eq!(profile.equipped_skin, Skin::Blue);

        assert_eq!(
            catalog.purchase(&mut profile, "blue"),
            Err(PurchaseError::AlreadyOwned(Skin::Blue))
        );
        assert_eq!(profile.total_coins, 120);
    }

    #[test]
    fn test_white_is_always_owned() {
        let catalog = ShopCatalog::default();
        let mut profile = rich(1000);
        assert_eq!(
            catalog.purchase(&mut profile, "white"),
            Err(PurchaseError::AlreadyOwned(Skin::White))
        );
        assert_eq!(catalog.equip(&mut profile, "white"), Ok(Skin::White));
    }

    #[test]
    fn test_invalid_skin_rejected() {
        let catalog = ShopCatalog::default();
        let mut profile = rich(1000);
        assert_eq!(
            catalog.purchase(&mut profile, "rainbow"),
            Err(PurchaseError::InvalidSkin("rainbow".to_string()))
        );
        assert_eq!(profile.total_coins, 1000);
    }

    #[test]
    fn test_equip_requires_ownership() {
        let catalog = ShopCatalog::default();
        let mut profile = rich(1000);
        assert_eq!(
            catalog.equip(&mut profile, "red"),
            Err(PurchaseError::NotOwned(Skin::Red))
        );
        catalog.purchase(&mut profile, "red").unwrap();
        catalog.purchase(&mut profile, "green").unwrap();
        assert_eq!(catalog.equip(&mut profile, "red"), Ok(Skin::Red));
        assert_eq!(profile.equipped_skin, Skin::Red);
    }
}
