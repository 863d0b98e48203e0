use std::collections::HashMap;

use rust_client::domain::{District, InfrastructureSite, Meter, User, Zone};

use super::present;

/// Id-keyed maps over the reference collections, built once per request so
/// joins run in memory instead of one query per row.
///
/// These collections are loaded without a row cap. That is fine while they
/// stay small; it is the first thing to revisit if they grow.
#[derive(Debug, Default)]
pub struct ReferenceTables {
    user_names: HashMap<String, String>,
    meter_sites: HashMap<String, String>,
    sites: HashMap<String, InfrastructureSite>,
    zone_names: HashMap<String, String>,
    district_names: HashMap<String, String>,
}

impl ReferenceTables {
    pub fn with_users(mut self, users: Vec<User>) -> Self {
        self.user_names = users
            .into_iter()
            .filter_map(|u| {
                let id = u.user_id.trim().to_string();
                match u.name {
                    Some(name) if !id.is_empty() => Some((id, name)),
                    _ => None,
                }
            })
            .collect();
        self
    }

    pub fn with_meters(mut self, meters: &[Meter]) -> Self {
        self.meter_sites = meters
            .iter()
            .filter_map(|m| {
                present(m.infrastructure_id.as_deref()).map(|infra| (m.meter_id.clone(), infra.to_string()))
            })
            .collect();
        self
    }

    pub fn with_sites(mut self, sites: Vec<InfrastructureSite>) -> Self {
        self.sites = sites
            .into_iter()
            .map(|s| (s.infrastructure_id.clone(), s))
            .collect();
        self
    }

    pub fn with_zones(mut self, zones: Vec<Zone>) -> Self {
        self.zone_names = zones
            .into_iter()
            .filter_map(|z| z.name.map(|name| (z.zone_id, name)))
            .collect();
        self
    }

    pub fn with_districts(mut self, districts: Vec<District>) -> Self {
        self.district_names = districts
            .into_iter()
            .filter_map(|d| d.name.map(|name| (d.district_id, name)))
            .collect();
        self
    }

    pub fn user_name(&self, user_id: Option<&str>) -> Option<&str> {
        present(user_id).and_then(|id| self.user_names.get(id.trim()).map(String::as_str))
    }

    pub fn site(&self, infrastructure_id: Option<&str>) -> Option<&InfrastructureSite> {
        present(infrastructure_id).and_then(|id| self.sites.get(id))
    }

    /// meter -> infrastructure site, `None` when any link is missing.
    pub fn site_of_meter(&self, meter_id: Option<&str>) -> Option<&InfrastructureSite> {
        let infra = present(meter_id).and_then(|id| self.meter_sites.get(id))?;
        self.sites.get(infra)
    }

    pub fn zone_name(&self, zone_id: Option<&str>) -> Option<&str> {
        present(zone_id).and_then(|id| self.zone_names.get(id).map(String::as_str))
    }

    pub fn district_name(&self, district_id: Option<&str>) -> Option<&str> {
        present(district_id).and_then(|id| self.district_names.get(id).map(String::as_str))
    }
}
