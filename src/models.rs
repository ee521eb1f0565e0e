use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Lifecycle state of a match record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    #[default]
    Upcoming,
    Live,
    Finished,
    Cancelled,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Upcoming => "upcoming",
            MatchStatus::Live => "live",
            MatchStatus::Finished => "finished",
            MatchStatus::Cancelled => "cancelled",
        }
    }

    /// Badge text shown next to a match
    pub fn label(&self) -> &'static str {
        match self {
            MatchStatus::Upcoming => "UPCOMING",
            MatchStatus::Live => "LIVE",
            MatchStatus::Finished => "FINISHED",
            MatchStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn next(&self) -> MatchStatus {
        match self {
            MatchStatus::Upcoming => MatchStatus::Live,
            MatchStatus::Live => MatchStatus::Finished,
            MatchStatus::Finished => MatchStatus::Cancelled,
            MatchStatus::Cancelled => MatchStatus::Upcoming,
        }
    }

    /// Scores are only meaningful while playing or after full time
    pub fn has_score(&self) -> bool {
        matches!(self, MatchStatus::Live | MatchStatus::Finished)
    }
}

/// A match record as stored in the `matches` collection
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Match {
    #[serde(default)]
    pub id: String,
    pub league: String,
    pub tour: u32,
    pub home_team: String,
    pub away_team: String,
    #[serde(with = "pb_datetime")]
    pub starts_at: DateTime<Utc>,
    pub status: MatchStatus,
    #[serde(default)]
    pub home_score: Option<i64>,
    #[serde(default)]
    pub away_score: Option<i64>,
    #[serde(default)]
    pub odd_home: Option<f64>,
    #[serde(default)]
    pub odd_draw: Option<f64>,
    #[serde(default)]
    pub odd_away: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub info: Option<String>,
}

impl Match {
    /// Score line for display, `-` before kickoff
    pub fn score_line(&self) -> String {
        if self.status.has_score() {
            format!(
                "{} : {}",
                self.home_score.unwrap_or(0),
                self.away_score.unwrap_or(0)
            )
        } else {
            String::from("- : -")
        }
    }

    pub fn kickoff_display(&self) -> String {
        self.starts_at.format("%d %b %H:%M").to_string()
    }
}

/// An authenticated admin account, read-only on the client
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub is_admin: Option<bool>,
}

/// Token plus the record it was issued for; persisted across runs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

/// Field of the match editor form
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DraftField {
    League,
    Tour,
    HomeTeam,
    AwayTeam,
    Date,
    Time,
    HomeScore,
    AwayScore,
    OddHome,
    OddDraw,
    OddAway,
    Info,
}

impl DraftField {
    pub fn label(&self) -> &'static str {
        match self {
            DraftField::League => "League",
            DraftField::Tour => "Round",
            DraftField::HomeTeam => "Home team",
            DraftField::AwayTeam => "Away team",
            DraftField::Date => "Date (YYYY-MM-DD)",
            DraftField::Time => "Time (HH:MM)",
            DraftField::HomeScore => "Home score",
            DraftField::AwayScore => "Away score",
            DraftField::OddHome => "Odd: home win",
            DraftField::OddDraw => "Odd: draw",
            DraftField::OddAway => "Odd: away win",
            DraftField::Info => "Info",
        }
    }

    pub fn next(&self) -> DraftField {
        use DraftField::*;
        match self {
            League => Tour,
            Tour => HomeTeam,
            HomeTeam => AwayTeam,
            AwayTeam => Date,
            Date => Time,
            Time => HomeScore,
            HomeScore => AwayScore,
            AwayScore => OddHome,
            OddHome => OddDraw,
            OddDraw => OddAway,
            OddAway => Info,
            Info => League,
        }
    }

    pub fn prev(&self) -> DraftField {
        use DraftField::*;
        match self {
            League => Info,
            Tour => League,
            HomeTeam => Tour,
            AwayTeam => HomeTeam,
            Date => AwayTeam,
            Time => Date,
            HomeScore => Time,
            AwayScore => HomeScore,
            OddHome => AwayScore,
            OddDraw => OddHome,
            OddAway => OddDraw,
            Info => OddAway,
        }
    }
}

/// String-buffer form model for the match editor.
///
/// Everything is edited as text and only converted on save; validation
/// reports per-field messages instead of failing on the first error.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchDraft {
    pub league: String,
    pub tour: String,
    pub home_team: String,
    pub away_team: String,
    pub date: String,
    pub time: String,
    pub status: MatchStatus,
    pub home_score: String,
    pub away_score: String,
    pub odd_home: String,
    pub odd_draw: String,
    pub odd_away: String,
    pub info: String,
}

impl Default for MatchDraft {
    fn default() -> Self {
        let now = Utc::now();
        MatchDraft {
            league: String::new(),
            tour: String::from("1"),
            home_team: String::new(),
            away_team: String::new(),
            date: now.format("%Y-%m-%d").to_string(),
            time: now.format("%H:%M").to_string(),
            status: MatchStatus::Upcoming,
            home_score: String::new(),
            away_score: String::new(),
            odd_home: String::new(),
            odd_draw: String::new(),
            odd_away: String::new(),
            info: String::new(),
        }
    }
}

impl MatchDraft {
    pub fn from_match(m: &Match) -> Self {
        MatchDraft {
            league: m.league.clone(),
            tour: m.tour.to_string(),
            home_team: m.home_team.clone(),
            away_team: m.away_team.clone(),
            date: m.starts_at.format("%Y-%m-%d").to_string(),
            time: m.starts_at.format("%H:%M").to_string(),
            status: m.status,
            home_score: m.home_score.map(|s| s.to_string()).unwrap_or_default(),
            away_score: m.away_score.map(|s| s.to_string()).unwrap_or_default(),
            odd_home: m.odd_home.map(|o| o.to_string()).unwrap_or_default(),
            odd_draw: m.odd_draw.map(|o| o.to_string()).unwrap_or_default(),
            odd_away: m.odd_away.map(|o| o.to_string()).unwrap_or_default(),
            info: m.info.clone().unwrap_or_default(),
        }
    }

    pub fn buffer(&self, field: DraftField) -> &str {
        match field {
            DraftField::League => &self.league,
            DraftField::Tour => &self.tour,
            DraftField::HomeTeam => &self.home_team,
            DraftField::AwayTeam => &self.away_team,
            DraftField::Date => &self.date,
            DraftField::Time => &self.time,
            DraftField::HomeScore => &self.home_score,
            DraftField::AwayScore => &self.away_score,
            DraftField::OddHome => &self.odd_home,
            DraftField::OddDraw => &self.odd_draw,
            DraftField::OddAway => &self.odd_away,
            DraftField::Info => &self.info,
        }
    }

    pub fn buffer_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::League => &mut self.league,
            DraftField::Tour => &mut self.tour,
            DraftField::HomeTeam => &mut self.home_team,
            DraftField::AwayTeam => &mut self.away_team,
            DraftField::Date => &mut self.date,
            DraftField::Time => &mut self.time,
            DraftField::HomeScore => &mut self.home_score,
            DraftField::AwayScore => &mut self.away_score,
            DraftField::OddHome => &mut self.odd_home,
            DraftField::OddDraw => &mut self.odd_draw,
            DraftField::OddAway => &mut self.odd_away,
            DraftField::Info => &mut self.info,
        }
    }

    /// Validate the form and build the record payload sent to the server.
    ///
    /// Scores are null unless the match is finished; absent odds are null.
    pub fn validate(&self) -> Result<serde_json::Value, Vec<(DraftField, String)>> {
        let mut errors: Vec<(DraftField, String)> = Vec::new();

        if self.league.trim().is_empty() {
            errors.push((DraftField::League, "League is required".into()));
        }
        if self.home_team.trim().is_empty() {
            errors.push((DraftField::HomeTeam, "Home team is required".into()));
        }
        if self.away_team.trim().is_empty() {
            errors.push((DraftField::AwayTeam, "Away team is required".into()));
        }

        let tour = match self.tour.trim().parse::<u32>() {
            Ok(t) if t >= 1 => Some(t),
            _ => {
                errors.push((DraftField::Tour, "Round must be 1 or greater".into()));
                None
            }
        };

        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| errors.push((DraftField::Date, "Expected YYYY-MM-DD".into())))
            .ok();
        let time = NaiveTime::parse_from_str(self.time.trim(), "%H:%M")
            .map_err(|_| errors.push((DraftField::Time, "Expected HH:MM".into())))
            .ok();

        let home_score = self.parse_score(DraftField::HomeScore, &self.home_score, &mut errors);
        let away_score = self.parse_score(DraftField::AwayScore, &self.away_score, &mut errors);

        if self.status == MatchStatus::Finished {
            if home_score.is_none() && self.home_score.trim().is_empty() {
                errors.push((DraftField::HomeScore, "Home score is required".into()));
            }
            if away_score.is_none() && self.away_score.trim().is_empty() {
                errors.push((DraftField::AwayScore, "Away score is required".into()));
            }
        }

        let odd_home = self.parse_odd(DraftField::OddHome, &self.odd_home, &mut errors);
        let odd_draw = self.parse_odd(DraftField::OddDraw, &self.odd_draw, &mut errors);
        let odd_away = self.parse_odd(DraftField::OddAway, &self.odd_away, &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        let starts_at = date
            .zip(time)
            .map(|(d, t)| d.and_time(t).and_utc())
            .expect("date and time validated above");

        let (home_score, away_score) = if self.status == MatchStatus::Finished {
            (home_score, away_score)
        } else {
            (None, None)
        };

        Ok(json!({
            "league": self.league.trim(),
            "tour": tour,
            "home_team": self.home_team.trim(),
            "away_team": self.away_team.trim(),
            "starts_at": starts_at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            "status": self.status.as_str(),
            "home_score": home_score,
            "away_score": away_score,
            "odd_home": odd_home,
            "odd_draw": odd_draw,
            "odd_away": odd_away,
            "info": self.info.trim(),
        }))
    }

    fn parse_score(
        &self,
        field: DraftField,
        buffer: &str,
        errors: &mut Vec<(DraftField, String)>,
    ) -> Option<i64> {
        let trimmed = buffer.trim();
        if trimmed.is_empty() {
            return None;
        }
        match trimmed.parse::<i64>() {
            Ok(s) if s >= 0 => Some(s),
            _ => {
                errors.push((field, "Score must be 0 or greater".into()));
                None
            }
        }
    }

    fn parse_odd(
        &self,
        field: DraftField,
        buffer: &str,
        errors: &mut Vec<(DraftField, String)>,
    ) -> Option<f64> {
        let trimmed = buffer.trim();
        if trimmed.is_empty() {
            return None;
        }
        match trimmed.parse::<f64>() {
            Ok(o) if o > 0.0 => Some(o),
            _ => {
                errors.push((field, "Odd must be greater than 0".into()));
                None
            }
        }
    }
}

/// Datetime codec for PocketBase's wire format.
///
/// The server emits `2024-12-25 14:30:00.000Z` (space separator) but accepts
/// RFC 3339 on write, so deserialization handles both.
pub mod pb_datetime {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    const PB_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.fZ";

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&raw, PB_FORMAT)
            .map(|n| n.and_utc())
            .map_err(serde::de::Error::custom)
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn finished_draft() -> MatchDraft {
        MatchDraft {
            league: "Premier League".into(),
            tour: "12".into(),
            home_team: "Arsenal".into(),
            away_team: "Chelsea".into(),
            date: "2024-12-25".into(),
            time: "14:30".into(),
            status: MatchStatus::Finished,
            home_score: "2".into(),
            away_score: "1".into(),
            odd_home: "1.85".into(),
            odd_draw: String::new(),
            odd_away: String::new(),
            info: String::new(),
        }
    }

    #[test]
    fn test_validate_builds_payload() {
        let payload = finished_draft().validate().unwrap();
        assert_eq!(payload["league"], "Premier League");
        assert_eq!(payload["tour"], 12);
        assert_eq!(payload["status"], "finished");
        assert_eq!(payload["home_score"], 2);
        assert_eq!(payload["odd_home"], 1.85);
        assert_eq!(payload["odd_draw"], serde_json::Value::Null);
        assert_eq!(payload["starts_at"], "2024-12-25T14:30:00.000Z");
    }

    #[test]
    fn test_validate_requires_teams_and_league() {
        let draft = MatchDraft {
            league: String::new(),
            home_team: "  ".into(),
            ..finished_draft()
        };
        let errors = draft.validate().unwrap_err();
        let fields: Vec<DraftField> = errors.iter().map(|(f, _)| *f).collect();
        assert!(fields.contains(&DraftField::League));
        assert!(fields.contains(&DraftField::HomeTeam));
    }

    #[test]
    fn test_validate_requires_scores_when_finished() {
        let draft = MatchDraft {
            home_score: String::new(),
            ..finished_draft()
        };
        let errors = draft.validate().unwrap_err();
        assert!(errors.iter().any(|(f, _)| *f == DraftField::HomeScore));
    }

    #[test]
    fn test_validate_nulls_scores_unless_finished() {
        let draft = MatchDraft {
            status: MatchStatus::Upcoming,
            ..finished_draft()
        };
        let payload = draft.validate().unwrap();
        assert_eq!(payload["home_score"], serde_json::Value::Null);
        assert_eq!(payload["away_score"], serde_json::Value::Null);
    }

    #[test]
    fn test_validate_rejects_bad_round_and_odds() {
        let draft = MatchDraft {
            tour: "0".into(),
            odd_home: "-1.5".into(),
            ..finished_draft()
        };
        let errors = draft.validate().unwrap_err();
        let fields: Vec<DraftField> = errors.iter().map(|(f, _)| *f).collect();
        assert!(fields.contains(&DraftField::Tour));
        assert!(fields.contains(&DraftField::OddHome));
    }

    #[test]
    fn test_match_deserializes_pocketbase_datetime() {
        let m: Match = serde_json::from_str(
            r#"{
                "id": "abc123",
                "league": "La Liga",
                "tour": 3,
                "home_team": "Real Madrid",
                "away_team": "Sevilla",
                "starts_at": "2024-11-02 18:00:00.000Z",
                "status": "upcoming",
                "info": ""
            }"#,
        )
        .unwrap();
        assert_eq!(
            m.starts_at,
            Utc.with_ymd_and_hms(2024, 11, 2, 18, 0, 0).unwrap()
        );
        assert_eq!(m.status, MatchStatus::Upcoming);
        assert_eq!(m.info, None);
        assert_eq!(m.home_score, None);
    }

    #[test]
    fn test_score_line_hidden_before_kickoff() {
        let m: Match = serde_json::from_str(
            r#"{
                "id": "x",
                "league": "L",
                "tour": 1,
                "home_team": "A",
                "away_team": "B",
                "starts_at": "2024-11-02T18:00:00Z",
                "status": "live",
                "home_score": 1
            }"#,
        )
        .unwrap();
        assert_eq!(m.score_line(), "1 : 0");

        let mut upcoming = m;
        upcoming.status = MatchStatus::Upcoming;
        assert_eq!(upcoming.score_line(), "- : -");
    }

    #[test]
    fn test_draft_round_trips_a_match() {
        let m: Match = serde_json::from_str(
            r#"{
                "id": "abc",
                "league": "Serie A",
                "tour": 7,
                "home_team": "Inter",
                "away_team": "Milan",
                "starts_at": "2025-03-01T20:45:00Z",
                "status": "finished",
                "home_score": 3,
                "away_score": 2,
                "odd_home": 2.1
            }"#,
        )
        .unwrap();
        let payload = MatchDraft::from_match(&m).validate().unwrap();
        assert_eq!(payload["home_team"], "Inter");
        assert_eq!(payload["tour"], 7);
        assert_eq!(payload["home_score"], 3);
        assert_eq!(payload["odd_home"], 2.1);
        assert_eq!(payload["starts_at"], "2025-03-01T20:45:00.000Z");
    }
}
