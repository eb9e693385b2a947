use std::collections::{HashMap, HashSet};

use anyhow::{bail, Result};
use harvx_types::Profile;

use crate::merge::merge_profile;

/// Flatten `name`'s `extends` chain into a single `Profile` via
/// depth-first resolution: ancestors are merged first, most distant
/// ancestor first, so a profile's own fields always win over anything it
/// inherits.
///
/// Cycles are detected via the `visiting` set and reported with the
/// full cycle path.
pub fn resolve_profile(name: &str, profiles: &HashMap<String, Profile>) -> Result<Profile> {
    let mut visiting = Vec::new();
    let mut visited = HashSet::new();
    resolve_inner(name, profiles, &mut visiting, &mut visited)
}

fn resolve_inner(
    name: &str,
    profiles: &HashMap<String, Profile>,
    visiting: &mut Vec<String>,
    visited: &mut HashSet<String>,
) -> Result<Profile> {
    if visiting.contains(&name.to_string()) {
        visiting.push(name.to_string());
        bail!("profile inheritance cycle detected: {}", visiting.join(" -> "));
    }
    let Some(profile) = profiles.get(name) else {
        bail!("unknown profile `{name}`");
    };
    if visited.contains(name) {
        return Ok(profile.clone());
    }

    visiting.push(name.to_string());
    let resolved = match &profile.extends {
        Some(parent) => {
            let parent_resolved = resolve_inner(parent, profiles, visiting, visited)?;
            merge_profile(&parent_resolved, profile)
        }
        None => profile.clone(),
    };
    visiting.pop();
    visited.insert(name.to_string());
    Ok(resolved)
}
