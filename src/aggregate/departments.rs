//! Department distribution.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::models::AttendanceRecord;

/// Chart palette, assigned cyclically by first appearance.
pub const DEPARTMENT_COLORS: [&str; 6] = ["#0088FE", "#00C49F", "#FFBB28", "#FF8042", "#8884D8", "#82CA9D"];

/// One slice of the department chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentShare {
    pub name: String,
    /// Distinct employees seen in this department.
    pub value: usize,
    pub color: &'static str,
}

/// Count distinct employees per department, in first-appearance order.
pub fn department_series(records: &[AttendanceRecord]) -> Vec<DepartmentShare> {
    let mut order: Vec<(&str, BTreeSet<&str>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        if record.department.is_empty() || record.employee_name.is_empty() {
            continue;
        }
        let slot = *index.entry(record.department.as_str()).or_insert_with(|| {
            order.push((record.department.as_str(), BTreeSet::new()));
            order.len() - 1
        });
        order[slot].1.insert(record.employee_name.as_str());
    }

    order
        .into_iter()
        .enumerate()
        .map(|(i, (name, employees))| DepartmentShare {
            name: name.to_string(),
            value: employees.len(),
            color: DEPARTMENT_COLORS[i % DEPARTMENT_COLORS.len()],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::test_support::*;

    #[test]
    fn test_first_appearance_order_and_distinct_counts() {
        let records = vec![
            in_department(record("Ann", "2024-01-01", "09:00"), "HR"),
            in_department(record("Bob", "2024-01-01", "09:00"), "IT"),
            in_department(record("Ann", "2024-01-02", "09:00"), "HR"),
            in_department(record("Cid", "2024-01-02", "09:00"), "HR"),
        ];
        let series = department_series(&records);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "HR");
        assert_eq!(series[0].value, 2);
        assert_eq!(series[0].color, "#0088FE");
        assert_eq!(series[1].name, "IT");
        assert_eq!(series[1].value, 1);
        assert_eq!(series[1].color, "#00C49F");
    }

    #[test]
    fn test_palette_cycles() {
        let records: Vec<_> = (0..8)
            .map(|i| in_department(record("Ann", "2024-01-01", "09:00"), &format!("D{i}")))
            .collect();
        let series = department_series(&records);
        assert_eq!(series[6].color, DEPARTMENT_COLORS[0]);
        assert_eq!(series[7].color, DEPARTMENT_COLORS[1]);
    }
}
