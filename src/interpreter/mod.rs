//! Operation interpreter
//!
//! Owns the working dataset and executes parsed operations against it in
//! file order. Filters replace the dataset with a narrowed copy; aggregates
//! read it and print a scalar. Each line's failure is isolated: the error is
//! reported on the output stream and the next line runs against the dataset
//! exactly as it was before the failure.

use crate::data::{resolve_field, CountyRecord};
use crate::ops::{OpError, Operation};
use std::io::Write;
use tracing::debug;

/// Strict comparison applied by the `filter-gt`/`filter-lt` operations.
#[derive(Debug, Clone, Copy)]
enum Comparison {
    Gt,
    Lt,
}

impl Comparison {
    fn keeps(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::Gt => value > threshold,
            Comparison::Lt => value < threshold,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Comparison::Gt => "gt",
            Comparison::Lt => "lt",
        }
    }
}

/// Executes operations against the working dataset, writing result lines to
/// the wrapped output stream.
pub struct Interpreter<W: Write> {
    counties: Vec<CountyRecord>,
    out: W,
}

impl<W: Write> Interpreter<W> {
    pub fn new(counties: Vec<CountyRecord>, out: W) -> Self {
        Self { counties, out }
    }

    /// The current working dataset.
    pub fn counties(&self) -> &[CountyRecord] {
        &self.counties
    }

    /// Run every line of an operations file.
    ///
    /// Blank lines are skipped; line numbers count every physical line
    /// starting at 1. A failing line prints a two-line error block and the
    /// run continues. Only a failure to write the error block itself aborts.
    pub fn run(&mut self, operations: &str) -> std::io::Result<()> {
        for (index, raw) in operations.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let result = Operation::parse(line).and_then(|op| self.execute(&op));
            if let Err(err) = result {
                writeln!(
                    self.out,
                    "Error: Malformed operation on line {}: '{}'",
                    index + 1,
                    line
                )?;
                writeln!(self.out, "  {err}")?;
            }
        }
        Ok(())
    }

    /// Execute one parsed operation.
    ///
    /// Handlers that replace the dataset compute the full replacement before
    /// assigning it, so an error never leaves a half-applied filter behind.
    pub fn execute(&mut self, op: &Operation) -> Result<(), OpError> {
        debug!("executing operation {:?} against {} records", op, self.counties.len());
        match op {
            Operation::Display => self.display(),
            Operation::FilterState(state) => self.filter_state(state),
            Operation::FilterGt { field, threshold } => {
                self.filter_compare(field, *threshold, Comparison::Gt)
            }
            Operation::FilterLt { field, threshold } => {
                self.filter_compare(field, *threshold, Comparison::Lt)
            }
            Operation::PopulationTotal => self.population_total(),
            Operation::PopulationSubtotal(field) => self.population_subtotal(field),
            Operation::Percent(field) => self.percent(field),
        }
    }

    fn display(&mut self) -> Result<(), OpError> {
        for county in &self.counties {
            writeln!(
                self.out,
                "{}, {} | Population: {}",
                county.county,
                county.state,
                county.total_population()
            )?;
        }
        Ok(())
    }

    fn filter_state(&mut self, state: &str) -> Result<(), OpError> {
        let kept: Vec<CountyRecord> = self
            .counties
            .iter()
            .filter(|county| county.state == state)
            .cloned()
            .collect();

        writeln!(self.out, "Filter: state == {} ({} entries)", state, kept.len())?;
        self.counties = kept;
        Ok(())
    }

    fn filter_compare(
        &mut self,
        field: &str,
        threshold: f64,
        cmp: Comparison,
    ) -> Result<(), OpError> {
        let segments: Vec<&str> = field.split('.').collect();
        // A record whose field does not resolve fails the predicate.
        let kept: Vec<CountyRecord> = self
            .counties
            .iter()
            .filter(|county| {
                resolve_field(county, &segments).is_some_and(|value| cmp.keeps(value, threshold))
            })
            .cloned()
            .collect();

        writeln!(
            self.out,
            "Filter: {} {} {} ({} entries)",
            field,
            cmp.label(),
            threshold,
            kept.len()
        )?;
        self.counties = kept;
        Ok(())
    }

    fn population_total(&mut self) -> Result<(), OpError> {
        let total = self.total_population();
        writeln!(self.out, "2014 population: {total}")?;
        Ok(())
    }

    fn population_subtotal(&mut self, field: &str) -> Result<(), OpError> {
        let subtotal = self.subtotal(field)?;
        writeln!(self.out, "2014 {field} population: {subtotal}")?;
        Ok(())
    }

    fn percent(&mut self, field: &str) -> Result<(), OpError> {
        let subtotal = self.subtotal(field)?;
        let total = self.total_population();
        let percentage = if total > 0.0 {
            (subtotal / total) * 100.0
        } else {
            0.0
        };
        writeln!(self.out, "2014 {field} percentage: {percentage}")?;
        Ok(())
    }

    fn total_population(&self) -> f64 {
        // Fold from an explicit 0.0: `Sum<f64>` yields -0.0 for an empty
        // iterator on recent toolchains, which would print as "-0".
        self.counties
            .iter()
            .map(CountyRecord::total_population)
            .fold(0.0, |acc, v| acc + v)
    }

    /// Sum of `total population * field / 100` over the working dataset.
    ///
    /// Any record on which the field does not resolve fails the whole
    /// operation; the caller reports it for this line only.
    fn subtotal(&self, field: &str) -> Result<f64, OpError> {
        let segments: Vec<&str> = field.split('.').collect();
        let mut sum = 0.0;
        for county in &self.counties {
            let value =
                resolve_field(county, &segments).ok_or_else(|| OpError::FieldNotFound {
                    field: field.to_string(),
                    county: county.county.clone(),
                })?;
            sum += county.total_population() * (value / 100.0);
        }
        Ok(sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_counties() -> Vec<CountyRecord> {
        serde_json::from_str(
            r#"[
                {
                    "county": "Ada",
                    "state": "ID",
                    "population": { "2014 Total Population": 100 },
                    "Education": { "Bachelor's Degree or Higher": 40.0 }
                },
                {
                    "county": "Bee",
                    "state": "OR",
                    "population": { "2014 Total Population": 200 },
                    "Education": { "Bachelor's Degree or Higher": 10.0 }
                }
            ]"#,
        )
        .unwrap()
    }

    fn interpreter(counties: Vec<CountyRecord>) -> Interpreter<Vec<u8>> {
        Interpreter::new(counties, Vec::new())
    }

    fn output(interp: &Interpreter<Vec<u8>>) -> String {
        String::from_utf8(interp.out.clone()).unwrap()
    }

    #[test]
    fn test_display_prints_records_in_order() {
        let mut interp = interpreter(two_counties());
        interp.execute(&Operation::Display).unwrap();
        assert_eq!(
            output(&interp),
            "Ada, ID | Population: 100\nBee, OR | Population: 200\n"
        );
    }

    #[test]
    fn test_filter_state_narrows_and_reports_count() {
        let mut interp = interpreter(two_counties());
        interp
            .execute(&Operation::FilterState("ID".to_string()))
            .unwrap();
        assert_eq!(interp.counties().len(), 1);
        assert_eq!(interp.counties()[0].county, "Ada");
        assert_eq!(output(&interp), "Filter: state == ID (1 entries)\n");

        interp.execute(&Operation::PopulationTotal).unwrap();
        assert!(output(&interp).ends_with("2014 population: 100\n"));
    }

    #[test]
    fn test_filter_state_is_case_sensitive() {
        let mut interp = interpreter(two_counties());
        interp
            .execute(&Operation::FilterState("id".to_string()))
            .unwrap();
        assert!(interp.counties().is_empty());
    }

    #[test]
    fn test_filter_state_is_idempotent() {
        let mut interp = interpreter(two_counties());
        let op = Operation::FilterState("OR".to_string());
        interp.execute(&op).unwrap();
        let after_first = interp.counties().to_vec();
        interp.execute(&op).unwrap();
        assert_eq!(interp.counties(), after_first.as_slice());
    }

    #[test]
    fn test_filter_gt_keeps_strictly_greater() {
        let mut interp = interpreter(two_counties());
        interp
            .execute(&Operation::FilterGt {
                field: "population.2014 Total Population".to_string(),
                threshold: 150.0,
            })
            .unwrap();
        assert_eq!(interp.counties().len(), 1);
        assert_eq!(interp.counties()[0].county, "Bee");
        assert_eq!(
            output(&interp),
            "Filter: population.2014 Total Population gt 150 (1 entries)\n"
        );
    }

    #[test]
    fn test_filter_gt_then_lt_same_threshold_is_empty() {
        let mut interp = interpreter(two_counties());
        let field = "Education.Bachelor's Degree or Higher".to_string();
        interp
            .execute(&Operation::FilterGt {
                field: field.clone(),
                threshold: 25.0,
            })
            .unwrap();
        interp
            .execute(&Operation::FilterLt {
                field,
                threshold: 25.0,
            })
            .unwrap();
        assert!(interp.counties().is_empty());
    }

    #[test]
    fn test_filter_excludes_unresolved_fields() {
        let mut interp = interpreter(two_counties());
        interp
            .execute(&Operation::FilterGt {
                field: "Income.Median Household Income".to_string(),
                threshold: 0.0,
            })
            .unwrap();
        assert!(interp.counties().is_empty());
    }

    #[test]
    fn test_population_total() {
        let mut interp = interpreter(two_counties());
        interp.execute(&Operation::PopulationTotal).unwrap();
        assert_eq!(output(&interp), "2014 population: 300\n");
    }

    #[test]
    fn test_population_subtotal() {
        let mut interp = interpreter(two_counties());
        interp
            .execute(&Operation::PopulationSubtotal(
                "Education.Bachelor's Degree or Higher".to_string(),
            ))
            .unwrap();
        // 100 * 0.40 + 200 * 0.10
        assert_eq!(
            output(&interp),
            "2014 Education.Bachelor's Degree or Higher population: 60\n"
        );
    }

    #[test]
    fn test_percent_is_subtotal_over_total() {
        let mut interp = interpreter(two_counties());
        interp
            .execute(&Operation::Percent(
                "Education.Bachelor's Degree or Higher".to_string(),
            ))
            .unwrap();
        // 60 / 300 * 100
        assert_eq!(
            output(&interp),
            "2014 Education.Bachelor's Degree or Higher percentage: 20\n"
        );
    }

    #[test]
    fn test_percent_on_empty_dataset_is_zero() {
        let mut interp = interpreter(Vec::new());
        interp
            .execute(&Operation::Percent(
                "Education.Bachelor's Degree or Higher".to_string(),
            ))
            .unwrap();
        assert_eq!(
            output(&interp),
            "2014 Education.Bachelor's Degree or Higher percentage: 0\n"
        );

        interp.execute(&Operation::PopulationTotal).unwrap();
        assert!(output(&interp).ends_with("2014 population: 0\n"));
    }

    #[test]
    fn test_aggregates_leave_dataset_unchanged() {
        let mut interp = interpreter(two_counties());
        let before = interp.counties().to_vec();

        interp.execute(&Operation::Display).unwrap();
        interp.execute(&Operation::PopulationTotal).unwrap();
        interp
            .execute(&Operation::PopulationSubtotal(
                "Education.Bachelor's Degree or Higher".to_string(),
            ))
            .unwrap();
        interp
            .execute(&Operation::Percent(
                "Education.Bachelor's Degree or Higher".to_string(),
            ))
            .unwrap();

        assert_eq!(interp.counties(), before.as_slice());
    }

    #[test]
    fn test_aggregate_over_missing_field_fails_that_line() {
        let mut interp = interpreter(two_counties());
        let before = interp.counties().to_vec();

        let err = interp
            .execute(&Operation::PopulationSubtotal(
                "Income.Median Household Income".to_string(),
            ))
            .unwrap_err();
        assert!(matches!(err, OpError::FieldNotFound { .. }));
        assert_eq!(interp.counties(), before.as_slice());
        assert!(output(&interp).is_empty());
    }

    #[test]
    fn test_run_reports_bad_line_and_continues() {
        let mut interp = interpreter(two_counties());
        interp
            .run("filter-state:ID\n\nbogus-op\npopulation-total\n")
            .unwrap();
        assert_eq!(
            output(&interp),
            "Filter: state == ID (1 entries)\n\
             Error: Malformed operation on line 3: 'bogus-op'\n\
             \x20\x20Unknown operation: bogus-op\n\
             2014 population: 100\n"
        );
    }

    #[test]
    fn test_run_skips_blank_lines_but_counts_them() {
        let mut interp = interpreter(two_counties());
        interp.run("\n   \nnope\n").unwrap();
        assert!(output(&interp).contains("on line 3: 'nope'"));
    }

    #[test]
    fn test_failed_filter_threshold_leaves_dataset_unchanged() {
        let mut interp = interpreter(two_counties());
        interp.run("filter-gt:Education.Bachelor's Degree or Higher:abc\n")
            .unwrap();
        assert_eq!(interp.counties().len(), 2);
        assert!(output(&interp).contains("Invalid numeric threshold: 'abc'"));
    }
}
