pub mod dashboard_queries;
