//! Combo rule table and matcher.
//!
//! A combo names a set of card IDs that must all have been observed, plus
//! a notes file describing the line of play. The table is data-driven: it
//! can be loaded from a JSON file, with a built-in branded-fusion table as
//! the default.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A named combination of required card IDs with an associated notes file.
///
/// Immutable after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combo {
    pub name: String,
    pub card_ids: Vec<u32>,
    pub file: PathBuf,
}

impl Combo {
    /// True when every required card ID is present in the snapshot.
    /// Duplicate requirements count once.
    pub fn is_satisfied_by(&self, present: &HashSet<u32>) -> bool {
        self.card_ids.iter().all(|id| present.contains(id))
    }
}

/// Declaration-ordered table of combo rules.
#[derive(Debug, Clone, Default)]
pub struct ComboTable {
    combos: Vec<Combo>,
}

impl ComboTable {
    pub fn new(combos: Vec<Combo>) -> Self {
        Self { combos }
    }

    /// Load a combo table from a JSON file holding an array of combos.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let combos: Vec<Combo> = serde_json::from_str(&contents)?;
        Ok(Self { combos })
    }

    /// All combos satisfied by the snapshot, in table order.
    ///
    /// An empty snapshot satisfies nothing. Pure: neither the table nor
    /// the snapshot is modified.
    pub fn matches(&self, snapshot: &[u32]) -> Vec<&Combo> {
        let present: HashSet<u32> = snapshot.iter().copied().collect();
        self.combos
            .iter()
            .filter(|combo| combo.is_satisfied_by(&present))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combo> {
        self.combos.iter()
    }

    pub fn len(&self) -> usize {
        self.combos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combos.is_empty()
    }

    /// The built-in branded-fusion table used when no file is supplied.
    pub fn builtin() -> Self {
        fn combo(name: &str, card_ids: &[u32], file: &str) -> Combo {
            Combo {
                name: name.to_string(),
                card_ids: card_ids.to_vec(),
                file: PathBuf::from(file),
            }
        }

        Self::new(vec![
            combo(
                "Deployment + Branded Fusion",
                &[15057, 17066],
                "./Branded Fusion/deployment_branded_fusion.txt",
            ),
            combo(
                "Deployment + Aluber",
                &[15057, 16195],
                "./Branded Fusion/deployment_aluber.txt",
            ),
            combo(
                "Aluber + Albaz",
                &[16195, 15245],
                "./Branded Fusion/aluber_albaz.txt",
            ),
            combo(
                "Branded Fusion + Aluber",
                &[17066, 16195],
                "./Branded Fusion/branded_fusion_aluber.txt",
            ),
            combo(
                "Cartesia + Black Dragon",
                &[16541, 16197],
                "./Branded Fusion/cartesia_black_dragon.txt",
            ),
            combo(
                "Cartesia + Gold Dragon",
                &[16541, 17765],
                "./Branded Fusion/cartesia_gold_dragon.txt",
            ),
            combo(
                "Cartesia + Saronir",
                &[16541, 17763],
                "./Branded Fusion/cartesia_saronir.txt",
            ),
            combo(
                "Cartesia + Tri-Brigade",
                &[16541, 17062],
                "./Branded Fusion/cartesia_tri_brigade.txt",
            ),
            combo(
                "Branded Fusion + Gold Dragon (drop guard)",
                &[17066, 17765],
                "./Branded Fusion/branded_fusion_gold_dragon_drop_guard.txt",
            ),
            combo(
                "Dragoon Guardian + Gold Dragon (drop guard)",
                &[13689, 17765],
                "./Branded Fusion/branded_fusion_gold_dragon_drop_guard.txt",
            ),
            combo(
                "Aluber + Gold Dragon (Magnamhut)",
                &[16195, 17765],
                "./Branded Fusion/aluber_gold_dragon_magnamhut.txt",
            ),
            combo(
                "Aluber + Gold Dragon (Saronir)",
                &[16195, 17765],
                "./Branded Fusion/aluber_gold_dragon_saronir.txt",
            ),
            combo(
                "Branded Fusion (Ice Sword)",
                &[17066],
                "./Branded Fusion/branded_fusion_ice_sword.txt",
            ),
            combo(
                "Branded Fusion (Gold Dragon + Puppet)",
                &[17066],
                "./Branded Fusion/branded_fusion_gold_dragon_puppet.txt",
            ),
            combo(
                "Herald + Gold Dragon",
                &[18474, 17765],
                "./Branded Fusion/herald_gold_dragon.txt",
            ),
        ])
    }
}
