use crate::models::{TripType, TypeId};
use std::collections::{HashMap, HashSet};

/// Lookup from (vehicle kind, membership kind) to a surrogate type key.
///
/// Keys are assigned by walking distinct vehicle kinds in first-seen order
/// and, for each, distinct membership kinds in first-seen order. Only pairs
/// that actually occur get a key, numbered consecutively from 0.
#[derive(Debug, Clone, Default)]
pub struct TypeLookup {
    entries: Vec<TripType>,
    keys: HashMap<(String, String), TypeId>,
}

impl TypeLookup {
    /// Build the lookup from the (vehicle, membership) cells of every trip.
    ///
    /// Each column contributes its distinct non-empty values on its own, so a
    /// value first seen next to an empty cell still takes its place in the
    /// order. Only pairs with both sides present count as observed.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut vehicles: Vec<&str> = Vec::new();
        let mut memberships: Vec<&str> = Vec::new();
        let mut observed: HashSet<(&str, &str)> = HashSet::new();

        for (vehicle, membership) in pairs {
            let (vehicle, membership) = (vehicle.trim(), membership.trim());
            if !vehicle.is_empty() && !vehicles.contains(&vehicle) {
                vehicles.push(vehicle);
            }
            if !membership.is_empty() && !memberships.contains(&membership) {
                memberships.push(membership);
            }
            if !vehicle.is_empty() && !membership.is_empty() {
                observed.insert((vehicle, membership));
            }
        }

        let mut lookup = Self::default();
        for vehicle in &vehicles {
            for membership in &memberships {
                if observed.contains(&(*vehicle, *membership)) {
                    lookup.push(vehicle, membership);
                }
            }
        }
        lookup
    }

    fn push(&mut self, vehicle: &str, membership: &str) {
        let type_id = self.entries.len() as TypeId;
        self.keys
            .insert((vehicle.to_string(), membership.to_string()), type_id);
        self.entries.push(TripType {
            type_id,
            rideable_type: vehicle.to_string(),
            member_casual: membership.to_string(),
            type_key: composite_key(vehicle, membership),
        });
    }

    pub fn type_id(&self, vehicle: &str, membership: &str) -> Option<TypeId> {
        self.keys
            .get(&(vehicle.trim().to_string(), membership.trim().to_string()))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rows of the type dimension, ordered by key
    pub fn entries(&self) -> &[TripType] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<TripType> {
        self.entries
    }
}

pub fn composite_key(vehicle: &str, membership: &str) -> String {
    format!("{}_{}", vehicle, membership)
}
