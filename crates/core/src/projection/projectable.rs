//! How each resource exposes itself to filtering and sorting

use std::fmt::Debug;
use std::hash::Hash;

use invoicedesk_domain::{Client, WorkOrder};

use super::sort::FieldValue;

/// A record the projection engine can filter and sort.
pub trait Projectable {
    /// Filter dimensions that take a set of accepted values.
    type Facet: Copy + Eq + Ord + Hash + Debug;
    /// Fields the list can be sorted by.
    type SortKey: Copy + Eq + Debug;

    /// Values of `facet` on this record. Multi-valued facets such as tags
    /// return one entry per value; an unset field returns none.
    fn facet_values(&self, facet: Self::Facet) -> Vec<&str>;

    /// `None` when the field is unset on this record.
    fn sort_value(&self, key: Self::SortKey) -> Option<FieldValue<'_>>;

    /// Fields scanned by the free-text search.
    fn search_fields(&self) -> Vec<&str>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WorkOrderFacet {
    Status,
    Priority,
    Client,
    Assignee,
    Tag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkOrderSortKey {
    Title,
    Status,
    Priority,
    ClientName,
    DueDate,
    CreatedAt,
    Amount,
}

impl Projectable for WorkOrder {
    type Facet = WorkOrderFacet;
    type SortKey = WorkOrderSortKey;

    fn facet_values(&self, facet: WorkOrderFacet) -> Vec<&str> {
        match facet {
            WorkOrderFacet::Status => vec![self.status.as_str()],
            WorkOrderFacet::Priority => vec![self.priority.as_str()],
            WorkOrderFacet::Client => self.client_id.as_deref().into_iter().collect(),
            WorkOrderFacet::Assignee => self.assignee.as_deref().into_iter().collect(),
            WorkOrderFacet::Tag => self.tags.iter().map(String::as_str).collect(),
        }
    }

    fn sort_value(&self, key: WorkOrderSortKey) -> Option<FieldValue<'_>> {
        match key {
            WorkOrderSortKey::Title => Some(FieldValue::Text(&self.title)),
            WorkOrderSortKey::Status => Some(FieldValue::Text(self.status.as_str())),
            WorkOrderSortKey::Priority => Some(FieldValue::Number(f64::from(self.priority.rank()))),
            WorkOrderSortKey::ClientName => self.client_name.as_deref().map(FieldValue::Text),
            WorkOrderSortKey::DueDate => self.due_date.map(FieldValue::Date),
            WorkOrderSortKey::CreatedAt => self.created_at.map(FieldValue::Date),
            WorkOrderSortKey::Amount => self.amount.map(FieldValue::Number),
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.id.as_str()];
        fields.extend(self.description.as_deref());
        fields.extend(self.client_name.as_deref());
        fields.extend(self.assignee.as_deref());
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClientFacet {
    Status,
    Tag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientSortKey {
    Name,
    Email,
    Company,
    CreatedAt,
    TotalBilled,
}

impl Projectable for Client {
    type Facet = ClientFacet;
    type SortKey = ClientSortKey;

    fn facet_values(&self, facet: ClientFacet) -> Vec<&str> {
        match facet {
            ClientFacet::Status => vec![self.status.as_str()],
            ClientFacet::Tag => self.tags.iter().map(String::as_str).collect(),
        }
    }

    fn sort_value(&self, key: ClientSortKey) -> Option<FieldValue<'_>> {
        match key {
            ClientSortKey::Name => Some(FieldValue::Text(&self.name)),
            ClientSortKey::Email => self.email.as_deref().map(FieldValue::Text),
            ClientSortKey::Company => self.company.as_deref().map(FieldValue::Text),
            ClientSortKey::CreatedAt => self.created_at.map(FieldValue::Date),
            ClientSortKey::TotalBilled => self.total_billed.map(FieldValue::Number),
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.id.as_str()];
        fields.extend(self.email.as_deref());
        fields.extend(self.company.as_deref());
        fields.extend(self.phone.as_deref());
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }
}
