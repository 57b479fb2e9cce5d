//! UseCase: 通報と問い合わせの記録
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ModerationService::report() / contact() メソッド
//!
//! ### なぜこのテストが必要か
//! - 通報・問い合わせが追記のみで記録されることを確認
//! - 空の理由・本文が記録されないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：Room 参加中 / 未参加のどちらでも通報できる
//! - 異常系：空の入力、ストア障害

use std::sync::Arc;

use crate::domain::{ContactText, ModerationSink, ParticipantId, ReportReason, RoomId};

use super::error::ModerationError;

/// 通報・問い合わせのユースケース
pub struct ModerationService {
    sink: Arc<dyn ModerationSink>,
}

impl ModerationService {
    /// 新しい ModerationService を作成
    pub fn new(sink: Arc<dyn ModerationSink>) -> Self {
        Self { sink }
    }

    /// 通報を記録する
    ///
    /// `room_id` は通報時に参加していた Room（参加していなければ None）。
    /// 退出処理は呼び出し側（セッション）が行う。
    pub async fn report(
        &self,
        room_id: Option<RoomId>,
        reporter: &ParticipantId,
        reason: &str,
    ) -> Result<(), ModerationError> {
        let reason = ReportReason::new(reason)?;
        self.sink
            .record_report(room_id, reporter.clone(), reason)
            .await?;
        Ok(())
    }

    /// 問い合わせを記録する
    pub async fn contact(&self, message: &str) -> Result<(), ModerationError> {
        let message = ContactText::new(message)?;
        self.sink.record_contact(message).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{RoomIdFactory, StoreError, ValueObjectError, repository::MockModerationSink},
        infrastructure::repository::InMemoryStore,
    };

    fn participant(id: &str) -> ParticipantId {
        ParticipantId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_report_is_recorded_with_room() {
        // テスト項目: 通報が Room と理由付きで記録される
        // given (前提条件):
        let store = Arc::new(InMemoryStore::new());
        let service = ModerationService::new(store.clone());
        let room_id = RoomIdFactory::generate();

        // when (操作):
        service
            .report(Some(room_id), &participant("alice"), " spam ")
            .await
            .unwrap();

        // then (期待する結果):
        let reports = store.reports().await;
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].room_id, Some(room_id));
        assert_eq!(reports[0].reporter, participant("alice"));
        assert_eq!(reports[0].reason.as_str(), "spam");
    }

    #[tokio::test]
    async fn test_report_without_room() {
        // テスト項目: Room 未参加でも通報できる
        // given (前提条件):
        let store = Arc::new(InMemoryStore::new());
        let service = ModerationService::new(store.clone());

        // when (操作):
        service
            .report(None, &participant("alice"), "harassment")
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(store.reports().await[0].room_id, None);
    }

    #[tokio::test]
    async fn test_empty_reason_is_rejected() {
        // テスト項目: 空の理由は記録されない
        // given (前提条件):
        let mut sink = MockModerationSink::new();
        sink.expect_record_report().times(0);
        let service = ModerationService::new(Arc::new(sink));

        // when (操作):
        let result = service.report(None, &participant("alice"), "   ").await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(ModerationError::Validation(ValueObjectError::Empty(_)))
        ));
    }

    #[tokio::test]
    async fn test_contact_is_recorded() {
        // テスト項目: 問い合わせが記録される
        // given (前提条件):
        let store = Arc::new(InMemoryStore::new());
        let service = ModerationService::new(store.clone());

        // when (操作):
        service.contact("the app froze").await.unwrap();

        // then (期待する結果):
        let contacts = store.contacts().await;
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].message.as_str(), "the app froze");
    }

    #[tokio::test]
    async fn test_contact_store_failure_is_propagated() {
        // テスト項目: ストア障害はエラーとして返る
        // given (前提条件):
        let mut sink = MockModerationSink::new();
        sink.expect_record_contact()
            .returning(|_| Err(StoreError::Unavailable("disk full".to_string())));
        let service = ModerationService::new(Arc::new(sink));

        // when (操作):
        let result = service.contact("hello").await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ModerationError::Store(StoreError::Unavailable(
                "disk full".to_string()
            )))
        );
    }
}
