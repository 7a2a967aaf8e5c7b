use chrono::{DateTime, Utc};

use crate::{
    BudgetStatus, CostWindows, DateRange, FullStats, GraphData, GraphField, ResultEngine, Summary,
    budget, graph, statistics, util::{end_of_day, normalize_username},
};

use super::Engine;

impl Engine {
    pub async fn summary(&self, username: &str) -> ResultEngine<Summary> {
        let username = normalize_username(username)?;
        let journeys = self
            .journeys_in(&self.database, &username, DateRange::default())
            .await?;
        Ok(statistics::summary(&journeys))
    }

    /// Rolling cost windows ending now.
    pub async fn cost_windows(&self, username: &str) -> ResultEngine<CostWindows> {
        self.cost_windows_at(username, Utc::now()).await
    }

    pub async fn cost_windows_at(
        &self,
        username: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<CostWindows> {
        let username = normalize_username(username)?;
        let journeys = self
            .journeys_in(&self.database, &username, DateRange::default())
            .await?;
        Ok(statistics::cost_windows(&journeys, now))
    }

    /// Full statistics over `range`; `range.end` covers its whole day. The
    /// per-day average spans the bounds as given. The tank volume is the
    /// user's, or the configured default.
    pub async fn full_stats(&self, username: &str, range: DateRange) -> ResultEngine<FullStats> {
        let username = normalize_username(username)?;
        let vehicle = self.vehicle_for(&self.database, &username).await?;
        let filter = DateRange {
            start: range.start,
            end: range.end.map(end_of_day),
        };
        let journeys = self.journeys_in(&self.database, &username, filter).await?;
        Ok(statistics::full_stats(&journeys, range, vehicle.tank_volume))
    }

    /// Budget status for the period containing now.
    pub async fn budget(&self, username: &str) -> ResultEngine<BudgetStatus> {
        self.budget_at(username, Utc::now()).await
    }

    pub async fn budget_at(&self, username: &str, now: DateTime<Utc>) -> ResultEngine<BudgetStatus> {
        let username = normalize_username(username)?;
        let Some(profile) = self.find_profile(&self.database, &username).await? else {
            return Ok(BudgetStatus::disabled());
        };
        if !profile.budget_enabled {
            return Ok(BudgetStatus::disabled());
        }

        let local_now = now.with_timezone(&self.config.timezone);
        let start = budget::period_start(profile.budget_range, profile.reset_day, &local_now);
        let range = DateRange {
            start: Some(start),
            end: None,
        };
        let journeys = self.journeys_in(&self.database, &username, range).await?;
        Ok(BudgetStatus {
            enabled: true,
            period: Some(budget::summarize(
                profile.budget_range,
                profile.budget_amount,
                start,
                &journeys,
            )),
        })
    }

    /// Graph points between `start` (default: the epoch) and the end of the
    /// day of `end` (default: today).
    pub async fn graph(
        &self,
        username: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        x: GraphField,
        y: GraphField,
    ) -> ResultEngine<GraphData> {
        let username = normalize_username(username)?;
        let range = DateRange {
            start: Some(start.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)),
            end: Some(end_of_day(end.unwrap_or_else(Utc::now))),
        };
        let journeys = self.journeys_in(&self.database, &username, range).await?;
        Ok(graph::extract(&journeys, x, y))
    }
}
