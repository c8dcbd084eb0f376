// src/utils/report.rs

use crate::model::dataset::Dataset;
use std::collections::BTreeMap;

/// Text summary of a symmetry dataset: space group, operations and the
/// Wyckoff orbit of every atom
pub fn dataset_summary(dataset: &Dataset) -> String {
    if !dataset.is_found() {
        return "No space group found.".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Space group: {} ({})  Hall: {} [{}]\n",
        dataset.international_symbol, dataset.spacegroup_number, dataset.hall_symbol, dataset.hall_number
    ));
    out.push_str(&format!(
        "Schoenflies: {}  Point group: {}\n",
        dataset.schoenflies, dataset.pointgroup
    ));
    out.push_str(&format!(
        "Operations: {}  Tolerance: {:.3e}\n",
        dataset.n_operations(),
        dataset.symprec
    ));
    let o = dataset.origin_shift;
    out.push_str(&format!("Origin shift: {:.5} {:.5} {:.5}\n", o[0], o[1], o[2]));

    // orbit representative -> members
    let mut orbits: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, &rep) in dataset.equivalent_atoms.iter().enumerate() {
        orbits.entry(rep).or_default().push(i);
    }

    out.push_str("--------------------------------------------------\n");
    out.push_str(&format!("{:<8} {:<8} {:<10} {}\n", "Orbit", "Wyckoff", "Count", "Atoms"));
    out.push_str("--------------------------------------------------\n");
    for (rep, members) in &orbits {
        let letter = dataset
            .wyckoffs
            .get(*rep)
            .copied()
            .flatten()
            .map_or_else(|| "-".to_string(), |c| c.to_string());
        let list: Vec<String> = members.iter().take(12).map(|i| i.to_string()).collect();
        let more = if members.len() > 12 { " ..." } else { "" };
        out.push_str(&format!(
            "{:<8} {:<8} {:<10} {}{}\n",
            rep,
            letter,
            members.len(),
            list.join(" "),
            more
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dataset_summary() {
        assert_eq!(dataset_summary(&Dataset::empty()), "No space group found.");
    }

    #[test]
    fn test_summary_lists_orbits() {
        let mut ds = Dataset::empty();
        ds.spacegroup_number = 221;
        ds.international_symbol = "Pm-3m".to_string();
        ds.wyckoffs = vec![Some('a'), Some('b')];
        ds.equivalent_atoms = vec![0, 1];
        let text = dataset_summary(&ds);
        assert!(text.contains("Pm-3m (221)"));
        assert_eq!(text.lines().filter(|l| l.starts_with('0') || l.starts_with('1')).count(), 2);
    }
}
