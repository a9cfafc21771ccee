use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse survey table: {0}")]
    Csv(#[from] csv::Error),
    #[error("record {record}: field `{field}` out of range: {value} (expected {expected})")]
    Domain {
        record: usize,
        field: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("survey table contains no records")]
    Empty,
}

/// One respondent. Likert codes run 1..=5 with 1 the most positive /
/// familiar answer; multi-select items are 0/1 flags; composite indices are
/// item means on the same 1..=5 scale.
#[derive(Debug, Clone, Deserialize)]
pub struct SurveyRecord {
    pub gender: u8,
    pub education: u8,
    pub major_stem: u8,
    pub major_econ: u8,
    pub major_humanities: u8,
    pub energy_experience: u8,
    pub transition_knowledge: u8,
    pub dual_carbon_knowledge: u8,
    pub renewable_solar: u8,
    pub renewable_wind: u8,
    pub renewable_hydro: u8,
    pub renewable_biomass: u8,
    pub renewable_oil: u8,
    pub renewable_coal: u8,
    pub renewable_gas: u8,
    pub renewable_nuclear: u8,
    pub trust_technology: u8,
    pub trust_nev_technology: u8,
    pub trust_policy_execution: u8,
    pub incentive_policy_approval: u8,
    pub fuel_limit_support: u8,
    pub purchase_intention: u8,
    pub vehicle_preference: u8,
    pub nev_impression: u8,
    pub factor_cost: u8,
    pub factor_environment: u8,
    pub factor_technology: u8,
    pub factor_range: u8,
    pub factor_charging: u8,
    pub factor_performance: u8,
    pub factor_policy: u8,
    pub factor_brand: u8,
    pub concern_range: u8,
    pub concern_charging: u8,
    pub concern_battery: u8,
    pub concern_price: u8,
    pub concern_safety: u8,
    pub concern_maintenance: u8,
    pub channel_courses: u8,
    pub channel_news: u8,
    pub channel_social: u8,
    pub channel_academic: u8,
    pub channel_friends: u8,
    pub goal_security: u8,
    pub goal_pollution: u8,
    pub goal_dependency: u8,
    pub goal_innovation: u8,
    pub goal_green: u8,
    pub duty_awareness: u8,
    pub focus_rnd: u8,
    pub focus_infrastructure: u8,
    pub focus_education: u8,
    pub focus_incentives: u8,
    pub focus_retrofit: u8,
    pub knowledge_index: f64,
    pub responsibility_index: f64,
    pub trust_index: f64,
    pub policy_index: f64,
    pub attitude: f64,
}

impl SurveyRecord {
    fn validate(&self, record: usize) -> Result<(), DataError> {
        fn coded(
            record: usize,
            field: &'static str,
            value: u8,
            max: u8,
            expected: &'static str,
        ) -> Result<(), DataError> {
            if value < 1 || value > max {
                return Err(DataError::Domain {
                    record,
                    field,
                    value: value.to_string(),
                    expected,
                });
            }
            Ok(())
        }
        fn flag(record: usize, field: &'static str, value: u8) -> Result<(), DataError> {
            if value > 1 {
                return Err(DataError::Domain {
                    record,
                    field,
                    value: value.to_string(),
                    expected: "0 or 1",
                });
            }
            Ok(())
        }
        fn index(record: usize, field: &'static str, value: f64) -> Result<(), DataError> {
            if !value.is_finite() || !(1.0..=5.0).contains(&value) {
                return Err(DataError::Domain {
                    record,
                    field,
                    value: value.to_string(),
                    expected: "1.0..=5.0",
                });
            }
            Ok(())
        }

        coded(record, "gender", self.gender, 2, "1..=2")?;
        coded(record, "education", self.education, 3, "1..=3")?;
        coded(record, "energy_experience", self.energy_experience, 2, "1..=2")?;
        coded(record, "duty_awareness", self.duty_awareness, 3, "1..=3")?;
        for (field, value) in [
            ("transition_knowledge", self.transition_knowledge),
            ("dual_carbon_knowledge", self.dual_carbon_knowledge),
            ("trust_technology", self.trust_technology),
            ("trust_nev_technology", self.trust_nev_technology),
            ("trust_policy_execution", self.trust_policy_execution),
            ("incentive_policy_approval", self.incentive_policy_approval),
            ("fuel_limit_support", self.fuel_limit_support),
            ("purchase_intention", self.purchase_intention),
            ("vehicle_preference", self.vehicle_preference),
            ("nev_impression", self.nev_impression),
        ] {
            coded(record, field, value, 5, "1..=5")?;
        }
        for (field, value) in [
            ("major_stem", self.major_stem),
            ("major_econ", self.major_econ),
            ("major_humanities", self.major_humanities),
            ("renewable_solar", self.renewable_solar),
            ("renewable_wind", self.renewable_wind),
            ("renewable_hydro", self.renewable_hydro),
            ("renewable_biomass", self.renewable_biomass),
            ("renewable_oil", self.renewable_oil),
            ("renewable_coal", self.renewable_coal),
            ("renewable_gas", self.renewable_gas),
            ("renewable_nuclear", self.renewable_nuclear),
            ("factor_cost", self.factor_cost),
            ("factor_environment", self.factor_environment),
            ("factor_technology", self.factor_technology),
            ("factor_range", self.factor_range),
            ("factor_charging", self.factor_charging),
            ("factor_performance", self.factor_performance),
            ("factor_policy", self.factor_policy),
            ("factor_brand", self.factor_brand),
            ("concern_range", self.concern_range),
            ("concern_charging", self.concern_charging),
            ("concern_battery", self.concern_battery),
            ("concern_price", self.concern_price),
            ("concern_safety", self.concern_safety),
            ("concern_maintenance", self.concern_maintenance),
            ("channel_courses", self.channel_courses),
            ("channel_news", self.channel_news),
            ("channel_social", self.channel_social),
            ("channel_academic", self.channel_academic),
            ("channel_friends", self.channel_friends),
            ("goal_security", self.goal_security),
            ("goal_pollution", self.goal_pollution),
            ("goal_dependency", self.goal_dependency),
            ("goal_innovation", self.goal_innovation),
            ("goal_green", self.goal_green),
            ("focus_rnd", self.focus_rnd),
            ("focus_infrastructure", self.focus_infrastructure),
            ("focus_education", self.focus_education),
            ("focus_incentives", self.focus_incentives),
            ("focus_retrofit", self.focus_retrofit),
        ] {
            flag(record, field, value)?;
        }
        for (field, value) in [
            ("knowledge_index", self.knowledge_index),
            ("responsibility_index", self.responsibility_index),
            ("trust_index", self.trust_index),
            ("policy_index", self.policy_index),
            ("attitude", self.attitude),
        ] {
            index(record, field, value)?;
        }
        Ok(())
    }
}

/// Likert items code 1 as the most positive answer; `6 - x` flips them onto
/// an ascending "higher is better" scale. Every renderer that needs the
/// flip goes through here.
pub fn reverse_likert(value: f64) -> f64 {
    6.0 - value
}

/// The loaded, validated survey table. Read-only after construction.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<SurveyRecord>,
}

impl Dataset {
    /// Validates every record's value domains once, up front, so renderers
    /// never hit a malformed row mid-draw.
    pub fn new(records: Vec<SurveyRecord>) -> Result<Self, DataError> {
        if records.is_empty() {
            return Err(DataError::Empty);
        }
        for (idx, record) in records.iter().enumerate() {
            record.validate(idx + 1)?;
        }
        Ok(Self { records })
    }

    pub fn from_csv_path(path: &Path) -> Result<Self, DataError> {
        let file = std::fs::File::open(path).map_err(|source| DataError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let records = csv_reader
            .deserialize()
            .collect::<Result<Vec<SurveyRecord>, _>>()?;
        Self::new(records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[SurveyRecord] {
        &self.records
    }

    /// Count per code value, ascending by code.
    pub fn value_counts(&self, get: impl Fn(&SurveyRecord) -> u8) -> BTreeMap<u8, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(get(record)).or_insert(0) += 1;
        }
        counts
    }

    /// Counts re-indexed onto an explicit code order, absent codes as zero.
    pub fn counts_for(&self, get: impl Fn(&SurveyRecord) -> u8, codes: &[u8]) -> Vec<usize> {
        let counts = self.value_counts(get);
        codes
            .iter()
            .map(|code| counts.get(code).copied().unwrap_or(0))
            .collect()
    }

    /// Number of respondents with a 0/1 flag set.
    pub fn flag_sum(&self, get: impl Fn(&SurveyRecord) -> u8) -> usize {
        self.records
            .iter()
            .filter(|record| get(record) == 1)
            .count()
    }

    /// Percentage of the full sample.
    pub fn share(&self, count: usize) -> f64 {
        count as f64 / self.records.len() as f64 * 100.0
    }

    pub fn mean(&self, get: impl Fn(&SurveyRecord) -> f64) -> f64 {
        let sum: f64 = self.records.iter().map(&get).sum();
        sum / self.records.len() as f64
    }

    /// Reverse-coded mean of a Likert item: higher is more positive.
    pub fn positive_mean(&self, get: impl Fn(&SurveyRecord) -> u8) -> f64 {
        reverse_likert(self.mean(|record| get(record) as f64))
    }

    /// Mean over the subgroup with `group(record) == code`; `None` for an
    /// empty subgroup.
    pub fn group_mean(
        &self,
        group: impl Fn(&SurveyRecord) -> u8,
        code: u8,
        value: impl Fn(&SurveyRecord) -> f64,
    ) -> Option<f64> {
        let values: Vec<f64> = self
            .records
            .iter()
            .filter(|record| group(record) == code)
            .map(&value)
            .collect();
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Values of a subgroup, for distribution panels.
    pub fn group_values(
        &self,
        group: impl Fn(&SurveyRecord) -> u8,
        code: u8,
        value: impl Fn(&SurveyRecord) -> f64,
    ) -> Vec<f64> {
        self.records
            .iter()
            .filter(|record| group(record) == code)
            .map(&value)
            .collect()
    }

    pub fn group_len(&self, group: impl Fn(&SurveyRecord) -> u8, code: u8) -> usize {
        self.records
            .iter()
            .filter(|record| group(record) == code)
            .count()
    }

    /// Source x target contingency counts over explicit code orders.
    pub fn crosstab(
        &self,
        source: impl Fn(&SurveyRecord) -> u8,
        target: impl Fn(&SurveyRecord) -> u8,
        source_codes: &[u8],
        target_codes: &[u8],
    ) -> Vec<Vec<usize>> {
        let mut table = vec![vec![0usize; target_codes.len()]; source_codes.len()];
        for record in &self.records {
            let src = source_codes.iter().position(|c| *c == source(record));
            let dst = target_codes.iter().position(|c| *c == target(record));
            if let (Some(i), Some(j)) = (src, dst) {
                table[i][j] += 1;
            }
        }
        table
    }

    pub fn column(&self, get: impl Fn(&SurveyRecord) -> f64) -> Vec<f64> {
        self.records.iter().map(get).collect()
    }

    /// The five composite indices used by the relational charts, paired
    /// with display labels. Intention is reverse-coded onto the ascending
    /// scale here, in one place.
    pub fn core_columns(&self) -> Vec<(&'static str, Vec<f64>)> {
        vec![
            ("Knowledge", self.column(|r| r.knowledge_index)),
            ("Responsibility", self.column(|r| r.responsibility_index)),
            ("Trust", self.column(|r| r.trust_index)),
            ("Policy", self.column(|r| r.policy_index)),
            ("Attitude", self.column(|r| r.attitude)),
            (
                "Intention",
                self.column(|r| reverse_likert(r.purchase_intention as f64)),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> SurveyRecord {
        SurveyRecord {
            gender: 1,
            education: 2,
            major_stem: 1,
            major_econ: 0,
            major_humanities: 0,
            energy_experience: 1,
            transition_knowledge: 2,
            dual_carbon_knowledge: 3,
            renewable_solar: 1,
            renewable_wind: 1,
            renewable_hydro: 1,
            renewable_biomass: 0,
            renewable_oil: 0,
            renewable_coal: 0,
            renewable_gas: 0,
            renewable_nuclear: 1,
            trust_technology: 2,
            trust_nev_technology: 2,
            trust_policy_execution: 3,
            incentive_policy_approval: 2,
            fuel_limit_support: 3,
            purchase_intention: 2,
            vehicle_preference: 1,
            nev_impression: 2,
            factor_cost: 1,
            factor_environment: 0,
            factor_technology: 1,
            factor_range: 1,
            factor_charging: 0,
            factor_performance: 0,
            factor_policy: 0,
            factor_brand: 0,
            concern_range: 1,
            concern_charging: 1,
            concern_battery: 0,
            concern_price: 1,
            concern_safety: 0,
            concern_maintenance: 0,
            channel_courses: 1,
            channel_news: 1,
            channel_social: 1,
            channel_academic: 0,
            channel_friends: 0,
            goal_security: 1,
            goal_pollution: 1,
            goal_dependency: 0,
            goal_innovation: 0,
            goal_green: 1,
            duty_awareness: 1,
            focus_rnd: 1,
            focus_infrastructure: 1,
            focus_education: 0,
            focus_incentives: 0,
            focus_retrofit: 0,
            knowledge_index: 3.5,
            responsibility_index: 4.0,
            trust_index: 3.8,
            policy_index: 4.2,
            attitude: 4.0,
        }
    }

    #[test]
    fn out_of_range_code_is_rejected_with_field_name() {
        let mut bad = record();
        bad.gender = 3;
        let err = Dataset::new(vec![record(), bad]).unwrap_err();
        match err {
            DataError::Domain { record, field, .. } => {
                assert_eq!(record, 2);
                assert_eq!(field, "gender");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn value_counts_sum_to_len() {
        let mut second = record();
        second.gender = 2;
        let dataset = Dataset::new(vec![record(), second, record()]).unwrap();
        let counts = dataset.value_counts(|r| r.gender);
        assert_eq!(counts.values().sum::<usize>(), dataset.len());
        assert_eq!(counts[&1], 2);
        assert_eq!(counts[&2], 1);
    }

    #[test]
    fn shares_over_a_partition_sum_to_hundred() {
        let mut second = record();
        second.education = 1;
        let mut third = record();
        third.education = 3;
        let dataset = Dataset::new(vec![record(), second, third]).unwrap();
        let total: f64 = dataset
            .counts_for(|r| r.education, &[1, 2, 3])
            .into_iter()
            .map(|count| dataset.share(count))
            .sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn reverse_coding_is_centralized() {
        let dataset = Dataset::new(vec![record()]).unwrap();
        // purchase_intention == 2 -> positive scale 4.
        assert!((dataset.positive_mean(|r| r.purchase_intention) - 4.0).abs() < 1e-12);
        assert_eq!(reverse_likert(1.0), 5.0);
    }

    #[test]
    fn csv_round_trip() {
        let header = "gender,education,major_stem,major_econ,major_humanities,energy_experience,transition_knowledge,dual_carbon_knowledge,renewable_solar,renewable_wind,renewable_hydro,renewable_biomass,renewable_oil,renewable_coal,renewable_gas,renewable_nuclear,trust_technology,trust_nev_technology,trust_policy_execution,incentive_policy_approval,fuel_limit_support,purchase_intention,vehicle_preference,nev_impression,factor_cost,factor_environment,factor_technology,factor_range,factor_charging,factor_performance,factor_policy,factor_brand,concern_range,concern_charging,concern_battery,concern_price,concern_safety,concern_maintenance,channel_courses,channel_news,channel_social,channel_academic,channel_friends,goal_security,goal_pollution,goal_dependency,goal_innovation,goal_green,duty_awareness,focus_rnd,focus_infrastructure,focus_education,focus_incentives,focus_retrofit,knowledge_index,responsibility_index,trust_index,policy_index,attitude";
        let row = "1,2,1,0,0,1,2,3,1,1,1,0,0,0,0,1,2,2,3,2,3,2,1,2,1,0,1,1,0,0,0,0,1,1,0,1,0,0,1,1,1,0,0,1,1,0,0,1,1,1,1,0,0,0,3.5,4.0,3.8,4.2,4.0";
        let csv = format!("{header}\n{row}\n{row}\n");
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.flag_sum(|r| r.factor_cost), 2);
    }

    #[test]
    fn crosstab_cells_sum_to_len() {
        let mut second = record();
        second.purchase_intention = 4;
        second.transition_knowledge = 5;
        let dataset = Dataset::new(vec![record(), second]).unwrap();
        let table = dataset.crosstab(
            |r| r.transition_knowledge,
            |r| r.purchase_intention,
            &[1, 2, 3, 4, 5],
            &[1, 2, 3, 4, 5],
        );
        let total: usize = table.iter().flatten().sum();
        assert_eq!(total, dataset.len());
    }
}
