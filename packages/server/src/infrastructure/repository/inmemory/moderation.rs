//! `ModerationSink` for the in-memory store.

use async_trait::async_trait;

use crate::domain::{
    ContactMessage, ContactText, ModerationSink, ParticipantId, Report, ReportReason, RoomId,
    StoreError,
};

use super::InMemoryStore;

#[async_trait]
impl ModerationSink for InMemoryStore {
    async fn record_report(
        &self,
        room_id: Option<RoomId>,
        reporter: ParticipantId,
        reason: ReportReason,
    ) -> Result<Report, StoreError> {
        let report = Report {
            room_id,
            reporter,
            reason,
            created_at: self.now(),
        };

        let mut tables = self.tables.lock().await;
        tables.reports.push(report.clone());
        tracing::info!(
            "Report recorded from '{}' (room: {})",
            report.reporter,
            report
                .room_id
                .map_or_else(|| "none".to_string(), |id| id.to_string())
        );
        Ok(report)
    }

    async fn record_contact(&self, message: ContactText) -> Result<ContactMessage, StoreError> {
        let contact = ContactMessage {
            message,
            created_at: self.now(),
        };

        let mut tables = self.tables.lock().await;
        tables.contacts.push(contact.clone());
        tracing::info!("Contact message recorded ({} total)", tables.contacts.len());
        Ok(contact)
    }
}
