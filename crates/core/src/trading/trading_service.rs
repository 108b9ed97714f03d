use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;

use crate::errors::Result;
use crate::trading::trading_model::{
    DateRangeFilter, NewTradingResult, TradingFilter, TradingResult,
};
use crate::trading::trading_traits::{TradingRepositoryTrait, TradingServiceTrait};

pub struct TradingService {
    repository: Arc<dyn TradingRepositoryTrait>,
}

impl TradingService {
    pub fn new(repository: Arc<dyn TradingRepositoryTrait>) -> Self {
        TradingService { repository }
    }
}

#[async_trait]
impl TradingServiceTrait for TradingService {
    fn get_last_trading_dates(&self, limit: i64) -> Result<Vec<NaiveDate>> {
        debug!("Loading last {} trading dates", limit);
        self.repository.last_trading_dates(limit)
    }

    fn get_dynamics(&self, filter: &DateRangeFilter) -> Result<Vec<TradingResult>> {
        debug!(
            "Loading trading dynamics {}..{} ({:?})",
            filter.start_date, filter.end_date, filter.filter
        );
        self.repository.dynamics(filter)
    }

    fn get_trading_results(
        &self,
        filter: &TradingFilter,
        limit: i64,
    ) -> Result<Vec<TradingResult>> {
        debug!("Loading last {} trading results ({:?})", limit, filter);
        self.repository.latest_results(filter, limit)
    }

    async fn import_results(&self, results: Vec<NewTradingResult>) -> Result<usize> {
        if results.is_empty() {
            return Ok(0);
        }
        let imported = self.repository.insert_results(results).await?;
        debug!("Imported {} trading results", imported);
        Ok(imported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use std::sync::RwLock;

    /// Mock repository keeping rows in memory.
    struct MockTradingRepository {
        rows: RwLock<Vec<TradingResult>>,
    }

    impl MockTradingRepository {
        fn new() -> Self {
            Self {
                rows: RwLock::new(Vec::new()),
            }
        }

        fn matches(filter: &TradingFilter, row: &TradingResult) -> bool {
            filter.oil_id.as_ref().map_or(true, |v| *v == row.oil_id)
                && filter
                    .delivery_type_id
                    .as_ref()
                    .map_or(true, |v| *v == row.delivery_type_id)
                && filter
                    .delivery_basis_id
                    .as_ref()
                    .map_or(true, |v| *v == row.delivery_basis_id)
        }
    }

    #[async_trait]
    impl TradingRepositoryTrait for MockTradingRepository {
        fn last_trading_dates(&self, limit: i64) -> Result<Vec<NaiveDate>> {
            let mut dates: Vec<NaiveDate> =
                self.rows.read().unwrap().iter().map(|r| r.date).collect();
            dates.sort_unstable_by(|a, b| b.cmp(a));
            dates.dedup();
            dates.truncate(limit as usize);
            Ok(dates)
        }

        fn dynamics(&self, filter: &DateRangeFilter) -> Result<Vec<TradingResult>> {
            Ok(self
                .rows
                .read()
                .unwrap()
                .iter()
                .filter(|r| filter.contains(r.date) && Self::matches(&filter.filter, r))
                .cloned()
                .collect())
        }

        fn latest_results(
            &self,
            filter: &TradingFilter,
            limit: i64,
        ) -> Result<Vec<TradingResult>> {
            let mut rows: Vec<TradingResult> = self
                .rows
                .read()
                .unwrap()
                .iter()
                .filter(|r| Self::matches(filter, r))
                .cloned()
                .collect();
            rows.sort_by(|a, b| b.date.cmp(&a.date));
            rows.truncate(limit as usize);
            Ok(rows)
        }

        async fn insert_results(&self, results: Vec<NewTradingResult>) -> Result<usize> {
            let mut rows = self.rows.write().unwrap();
            let stamp = NaiveDateTime::default();
            for new in &results {
                let id = rows.len() as i32 + 1;
                rows.push(TradingResult {
                    id,
                    exchange_product_id: new.exchange_product_id.clone(),
                    exchange_product_name: new.exchange_product_name.clone(),
                    oil_id: new.oil_id.clone(),
                    delivery_basis_id: new.delivery_basis_id.clone(),
                    delivery_basis_name: new.delivery_basis_name.clone(),
                    delivery_type_id: new.delivery_type_id.clone(),
                    volume: new.volume,
                    total: new.total,
                    count: new.count,
                    date: new.date,
                    created_on: stamp,
                    updated_on: stamp,
                });
            }
            Ok(results.len())
        }
    }

    fn new_result(oil_id: &str, basis: &str, kind: &str, date: &str) -> NewTradingResult {
        NewTradingResult {
            exchange_product_id: format!("{}{}060F", oil_id, basis),
            exchange_product_name: format!("Product {}", oil_id),
            oil_id: oil_id.to_string(),
            delivery_basis_id: basis.to_string(),
            delivery_basis_name: format!("Basis {}", basis),
            delivery_type_id: kind.to_string(),
            volume: 100,
            total: 1_000,
            count: 1,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        }
    }

    async fn seeded_service() -> TradingService {
        let service = TradingService::new(Arc::new(MockTradingRepository::new()));
        let imported = service
            .import_results(vec![
                new_result("A592", "AKR", "F", "2023-01-09"),
                new_result("A925", "KIT", "A", "2024-10-01"),
                new_result("DSC5", "NVL", "A", "2025-03-23"),
            ])
            .await
            .unwrap();
        assert_eq!(imported, 3);
        service
    }

    #[tokio::test]
    async fn test_import_of_nothing_is_a_no_op() {
        let service = TradingService::new(Arc::new(MockTradingRepository::new()));
        assert_eq!(service.import_results(Vec::new()).await.unwrap(), 0);
        assert!(service.get_last_trading_dates(5).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_service_delegates_to_repository() {
        let service = seeded_service().await;

        let dates = service.get_last_trading_dates(2).unwrap();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2025, 3, 23).unwrap(),
                NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
            ]
        );

        let filter = DateRangeFilter {
            filter: TradingFilter::default(),
            start_date: NaiveDate::from_ymd_opt(2023, 1, 9).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2023, 3, 23).unwrap(),
        };
        let rows = service.get_dynamics(&filter).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].oil_id, "A592");

        let filter = TradingFilter {
            delivery_type_id: Some("A".to_string()),
            ..Default::default()
        };
        let rows = service.get_trading_results(&filter, 5).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].oil_id, "DSC5");
    }
}
