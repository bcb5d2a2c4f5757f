//! Name remapping tables used during normalisation.
//!
//! The provider spells teams and colleges differently from the dimension
//! tables. These maps are loaded once at start-up and never mutated; lookups
//! are exact-key.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

const TEAMS: &[(&str, &str)] = &[
  ("NY Giants", "New York Giants"),
  ("NY Jets", "New York Jets"),
  ("LA Rams", "Los Angeles Rams"),
  ("LA Chargers", "Los Angeles Chargers"),
  ("KC Chiefs", "Kansas City Chiefs"),
  ("TB Buccaneers", "Tampa Bay Buccaneers"),
  ("NE Patriots", "New England Patriots"),
  ("GB Packers", "Green Bay Packers"),
  ("SF 49ers", "San Francisco 49ers"),
  ("NO Saints", "New Orleans Saints"),
  ("JAX Jaguars", "Jacksonville Jaguars"),
  ("LV Raiders", "Las Vegas Raiders"),
];

const COLLEGES: &[(&str, &str)] = &[
  ("Mississippi St.", "Mississippi State"),
  ("Ole Miss", "Mississippi"),
  ("Texas A&M", "Texas A&M"),
  ("Texas AM", "Texas A&M"),
  ("Miami (FL)", "Miami"),
  ("Valdosta St.", "Valdosta State"),
  ("Mid Tenn St.", "Middle Tennessee"),
  ("Alabama St.", "Alabama State"),
  ("Alcorn St.", "Alcorn State"),
  ("Appalach. St.", "Appalachian State"),
  ("Arizona St.", "Arizona State"),
  ("Arkansas St.", "Arkansas State"),
  ("Arkansas P.B.", "Arkansas–Pine Bluff"),
  ("Bowling Green St.", "Bowling Green"),
  ("California-Davis", "UC Davis"),
  ("Campbell Univ.", "Campbell"),
  ("Colorado St.", "Colorado State"),
  ("CSU-Pueblo", "CSU Pueblo"),
  ("Connecticut", "UConn"),
  ("East Central Univ.", "East Central"),
  ("E. Illinois", "Eastern Illinois"),
  ("E. Kentucky", "Eastern Kentucky"),
  ("Eastern Wash.", "Eastern Washington"),
  ("Elon University", "Elon"),
  ("Florida AM", "Florida A&M"),
  ("Ga. Southern", "Georgia Southern"),
  ("Grambling St.", "Grambling State"),
  ("Grand Valley St.", "Grand Valley State"),
  ("Greenville College", "Greenville"),
  ("Hawaii", "Hawaiʻi"),
  ("Houston Baptist", "Houston Christian"),
  ("Humboldt St.", "Cal Poly Humboldt"),
  ("Humboldt State", "Cal Poly Humboldt"),
  ("Illinois St.", "Illinois State"),
  ("IUP", "Indiana (PA)"),
  ("Jackson St.", "Jackson State"),
  ("J. Madison", "James Madison"),
  ("LA Tech", "Louisiana Tech"),
  ("LA. Tech", "Louisiana Tech"),
  ("Lenoir-Rhyne University", "Lenoir-Rhyne"),
  ("Malone University", "Malone"),
  ("Massachusetts", "UMass"),
  ("Miami Univ.", "Miami (OH)"),
  ("Miami (OH)", "Miami (Ohio)"),
  ("Michigan St.", "Michigan State"),
  ("Minnesota State", "Minnesota State-Mankato"),
  ("Missouri W State", "Missouri Western"),
  ("Missouri University of Science and Technology", "Missouri S&T"),
  ("Missouri University of Science & Technology", "Missouri S&T"),
  ("None", "No College"),
  ("N.C. AT", "North Carolina A&T"),
  ("NC Central", "North Carolina Central"),
  ("NC State", "North Carolina State"),
  ("N.C. State", "NC State"),
  ("North Dakota St.", "North Dakota State"),
  ("N. Arizona", "Northern Arizona"),
  ("N. Colorado", "Northern Colorado"),
  ("N. Illinois", "Northern Illinois"),
  ("Oklahoma St.", "Oklahoma State"),
  ("Pittsburg St.", "Pittsburg State"),
  ("P. View AM", "Prairie View A&M"),
  ("Saginaw Valley", "Saginaw Valley State"),
  ("St. John's", "Saint John's"),
  ("San Diego St.", "San Diego State"),
  ("San Jose St.", "San Jose State"),
  ("Shepherd Univ.", "Shepherd"),
  ("S. Dakota St.", "South Dakota State"),
  ("S.C. State", "South Carolina State"),
  ("SE Missouri St.", "Southeast Missouri State"),
  ("S. Illinois", "Southern Illinois"),
  ("Tenn-Chat", "Chattanooga"),
  ("Tenn-Martin", "UT Martin"),
  ("Texas AM-Commerce", "Texas A&M-Commerce"),
  ("Tusculum College", "Tusculum"),
  ("UL Monroe", "Louisiana-Monroe"),
  ("UL Lafayette", "Louisiana"),
  ("UTSA", "Texas-San Antonio"),
  ("UAB", "Alabama-Birmingham"),
  ("UBC", "British Columbia"),
  ("UCF", "Central Florida"),
  ("USC", "Southern California"),
  ("USF", "South Florida"),
  ("UCLA", "California-Los Angeles"),
  ("University of Charleston", "Charleston"),
  ("UNLV", "Nevada-Las Vegas"),
  ("Wagner College", "Wagner"),
  ("Wash. St.", "Washington State"),
  ("W. Illinois", "Western Illinois"),
  ("W. Kentucky", "Western Kentucky"),
  ("W. Michigan", "Western Michigan"),
  ("William  Mary", "William & Mary"),
  ("Wisc-Whitewater", "Wisconsin-Whitewater"),
  ("Youngstown St.", "Youngstown State"),
  ("SMU", "Southern Methodist"),
  ("TCU", "Texas Christian"),
  ("LSU", "Louisiana State"),
  ("FIU", "Florida International"),
  ("FAU", "Florida Atlantic"),
  ("BYU", "Brigham Young"),
  ("Cal", "California"),
  ("UConn", "Connecticut"),
  ("UMass", "Massachusetts"),
  ("UTEP", "Texas-El Paso"),
];

const COLLEGE_OVERRIDES: &[(&str, &str)] = &[
  ("Grover Stewart", "Albany State"),
  ("Jalyx Hunt", "Cornell"),
  ("Dondrea Tillman", "Indiana (PA)"),
  ("Kameron Johnson", "Barton"),
];

fn table(entries: &[(&str, &str)]) -> HashMap<String, String> {
  entries
    .iter()
    .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
    .collect()
}

/// Exact-key remapping tables for teams and colleges.
///
/// Deserialises from a TOML document with optional `[teams]`, `[colleges]`
/// and `[college_overrides]` tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameMappings {
  /// Provider short name → full team label.
  #[serde(default)]
  pub teams:             HashMap<String, String>,
  /// Provider college spelling → college table name.
  #[serde(default)]
  pub colleges:          HashMap<String, String>,
  /// `"<first> <last>"` → college table name, consulted before anything
  /// else.
  #[serde(default)]
  pub college_overrides: HashMap<String, String>,
}

impl NameMappings {
  /// The tables shipped with the engine.
  pub fn builtin() -> Self {
    Self {
      teams:             table(TEAMS),
      colleges:          table(COLLEGES),
      college_overrides: table(COLLEGE_OVERRIDES),
    }
  }

  /// Layer `other` on top of `self`; entries in `other` win.
  pub fn merged(mut self, other: NameMappings) -> Self {
    self.teams.extend(other.teams);
    self.colleges.extend(other.colleges);
    self.college_overrides.extend(other.college_overrides);
    self
  }

  /// The full team label for a provider short name, or the name itself.
  pub fn team_label<'a>(&'a self, short_name: &'a str) -> &'a str {
    self.teams.get(short_name).map_or(short_name, String::as_str)
  }

  pub fn college_alias(&self, raw: &str) -> Option<&str> {
    self.colleges.get(raw).map(String::as_str)
  }

  pub fn college_override(&self, player_name: &str) -> Option<&str> {
    self.college_overrides.get(player_name).map(String::as_str)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn team_remap_falls_back_to_input() {
    let m = NameMappings::builtin();
    assert_eq!(m.team_label("KC Chiefs"), "Kansas City Chiefs");
    assert_eq!(m.team_label("Buffalo Bills"), "Buffalo Bills");
  }

  #[test]
  fn college_tables() {
    let m = NameMappings::builtin();
    assert_eq!(m.college_alias("Texas AM"), Some("Texas A&M"));
    assert_eq!(m.college_alias("Alabama"), None);
    assert_eq!(m.college_override("Grover Stewart"), Some("Albany State"));
  }

  #[test]
  fn merged_entries_win() {
    let extra: NameMappings = serde_json::from_value(serde_json::json!({
      "teams": { "KC Chiefs": "Kansas City" },
      "college_overrides": { "Pat Example": "Rice" }
    }))
    .unwrap();

    let m = NameMappings::builtin().merged(extra);
    assert_eq!(m.team_label("KC Chiefs"), "Kansas City");
    assert_eq!(m.team_label("NY Jets"), "New York Jets");
    assert_eq!(m.college_override("Pat Example"), Some("Rice"));
  }
}
