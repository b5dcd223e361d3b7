use crate::domain::Lead;
use std::collections::HashSet;

/// Pairwise duplicate check: a candidate duplicates an existing lead iff its
/// non-empty email or non-empty phone exactly matches the lead's. Empty
/// fields never match, so all-empty leads do not collapse together.
pub fn is_duplicate(candidate_email: &str, candidate_phone: &str, existing: &[Lead]) -> bool {
    existing.iter().any(|lead| {
        (!candidate_email.is_empty() && lead.email == candidate_email)
            || (!candidate_phone.is_empty() && lead.phone == candidate_phone)
    })
}

/// Phone/email hash sets built once per import batch, so a batch of m rows
/// against n stored leads costs O(n + m) instead of rescanning per row.
#[derive(Debug, Default)]
pub struct DedupIndex {
    emails: HashSet<String>,
    phones: HashSet<String>,
}

impl DedupIndex {
    pub fn from_leads(leads: &[Lead]) -> Self {
        let mut index = Self::default();
        for lead in leads {
            index.insert(&lead.email, &lead.phone);
        }
        index
    }

    pub fn insert(&mut self, email: &str, phone: &str) {
        if !email.is_empty() {
            self.emails.insert(email.to_string());
        }
        if !phone.is_empty() {
            self.phones.insert(phone.to_string());
        }
    }

    pub fn contains(&self, email: &str, phone: &str) -> bool {
        (!email.is_empty() && self.emails.contains(email))
            || (!phone.is_empty() && self.phones.contains(phone))
    }
}

#[cfg(test)]
mod tests {
    use super::{is_duplicate, DedupIndex};
    use crate::domain::{Lead, LeadId, LeadPriority, LeadStatus};

    fn lead(email: &str, phone: &str) -> Lead {
        Lead {
            id: LeadId::new(),
            name: "Someone".to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
            source: "01".to_string(),
            status: LeadStatus::default(),
            priority: LeadPriority::default(),
            interest_cycle: None,
            business_unit: None,
            tags: Vec::new(),
            observations: String::new(),
            scheduled_at: None,
            has_unread_messages: false,
            history: Vec::new(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn duplicate_on_email_is_symmetric() {
        let a = lead("jane@x.com", "");
        let b = lead("jane@x.com", "5550000000");
        assert!(is_duplicate(&a.email, &a.phone, &[b.clone()]));
        assert!(is_duplicate(&b.email, &b.phone, &[a]));
    }

    #[test]
    fn duplicate_on_phone() {
        let existing = lead("", "5551234567");
        assert!(is_duplicate("", "5551234567", &[existing]));
    }

    #[test]
    fn empty_fields_never_match() {
        let a = lead("", "");
        let b = lead("", "");
        assert!(!is_duplicate(&a.email, &a.phone, &[b]));
    }

    #[test]
    fn index_agrees_with_linear_scan() {
        let existing = vec![
            lead("jane@x.com", "5551234567"),
            lead("", "5559999999"),
            lead("", ""),
        ];
        let index = DedupIndex::from_leads(&existing);

        for (email, phone) in [
            ("jane@x.com", ""),
            ("", "5559999999"),
            ("other@x.com", "5550000001"),
            ("", ""),
        ] {
            assert_eq!(
                index.contains(email, phone),
                is_duplicate(email, phone, &existing),
                "index disagrees for ({email}, {phone})"
            );
        }
    }

    #[test]
    fn index_insert_catches_within_batch_duplicates() {
        let mut index = DedupIndex::from_leads(&[]);
        index.insert("jane@x.com", "5551234567");
        assert!(index.contains("jane@x.com", ""));
        assert!(index.contains("", "5551234567"));
    }
}
