//! Vocation table loader.

use std::path::Path;

use character_core::{Vocation, VocationId, VocationOracle, VocationTable};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Vocation table structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocationFile {
    pub vocations: Vec<Vocation>,
}

/// Loader for vocation balance tables from RON files.
pub struct VocationLoader;

impl VocationLoader {
    /// Load vocations from a RON file.
    ///
    /// The starting vocation is always present in the result; a file entry
    /// with id 0 replaces the built-in one.
    pub fn load(path: &Path) -> LoadResult<VocationTable> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse vocation table RON {}: {}", path.display(), e)
        })
    }

    /// Parse vocations from RON text.
    pub fn parse(content: &str) -> LoadResult<VocationTable> {
        let file: VocationFile = ron::from_str(content)?;
        let table: VocationTable = file.vocations.into_iter().collect();

        for vocation in table.iter() {
            if let Some(promotion) = vocation.promotion
                && table.vocation(promotion).is_none()
            {
                anyhow::bail!(
                    "vocation {} promotes into unknown vocation {:?}",
                    vocation.name,
                    promotion
                );
            }
            if vocation.promotion == Some(vocation.id) {
                anyhow::bail!("vocation {} promotes into itself", vocation.name);
            }
            if vocation.mana_multiplier < 1.0 && vocation.id != VocationId::NONE {
                tracing::warn!(
                    vocation = %vocation.name,
                    multiplier = vocation.mana_multiplier,
                    "mana multiplier below 1.0 makes magic levels cheaper than the base curve"
                );
            }
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use character_core::SkillKind;

    use super::*;

    #[test]
    fn parses_multipliers_and_promotions() {
        let table = VocationLoader::parse(
            r#"
            #![enable(unwrap_newtypes)]
            (
                vocations: [
                    (
                        id: 4,
                        name: "Knight",
                        promotion: Some(8),
                        hp_gain: 15,
                        skill_multipliers: (1.5, 2.0, 1.1, 1.1, 1.4, 1.1, 1.1),
                        mana_multiplier: 3.0,
                    ),
                    (id: 8, name: "Elite Knight", hp_gain: 15, mana_multiplier: 3.0),
                ],
            )
            "#,
        )
        .unwrap();

        assert_eq!(table.len(), 3);
        let knight = table.vocation(VocationId(4)).unwrap();
        assert!(!knight.is_promoted());
        assert_eq!(knight.req_skill_tries(SkillKind::Sword, 11), 50);
        assert!(table.vocation(VocationId(8)).unwrap().is_promoted());
    }

    #[test]
    fn rejects_dangling_promotion() {
        let err = VocationLoader::parse(
            r#"
            #![enable(unwrap_newtypes)]
            (vocations: [(id: 1, name: "Sorcerer", promotion: Some(5))])
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown vocation"));
    }
}
