//! Archive member selection.
//!
//! A selector is a pure predicate over a member's stored name. It decides
//! which members of an archive are extracted; the order in which members are
//! presented never affects its answer.

/// Exact member names that belong to a datapack.
const DATAPACK_FILES: [&str; 2] = ["pack.mcmeta", "pack.png"];

/// Directory prefix holding datapack content.
const DATAPACK_PREFIX: &str = "data/";

/// Predicate deciding whether an archive member is extracted.
pub trait MemberSelector {
    /// Return `true` if the member stored under `name` should be extracted.
    fn accepts(&self, name: &str) -> bool;
}

impl<F> MemberSelector for F
where
    F: Fn(&str) -> bool,
{
    fn accepts(&self, name: &str) -> bool {
        self(name)
    }
}

/// Selects the vanilla datapack: `pack.mcmeta`, `pack.png`, and `data/**`.
///
/// # Examples
///
/// ```
/// use vanilla_extractor::selector::{DatapackSelector, MemberSelector};
///
/// assert!(DatapackSelector.accepts("data/minecraft/loot_table/chests/igloo_chest.json"));
/// assert!(DatapackSelector.accepts("pack.mcmeta"));
/// assert!(!DatapackSelector.accepts("assets/minecraft/lang/en_us.json"));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatapackSelector;

impl MemberSelector for DatapackSelector {
    fn accepts(&self, name: &str) -> bool {
        DATAPACK_FILES.contains(&name) || name.starts_with(DATAPACK_PREFIX)
    }
}
