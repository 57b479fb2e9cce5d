//! Server configuration.

use crate::{domain::factory::MIN_IDENTITY_LEN, usecase::MatchmakingConfig};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

/// サーバーの設定（コマンドライン引数・環境変数から組み立てる）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub matchmaking: MatchmakingConfig,
    /// 生成する参加者 ID のランダム部分の長さ
    pub identity_length: usize,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            matchmaking: MatchmakingConfig::default(),
            identity_length: MIN_IDENTITY_LEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // テスト項目: デフォルト設定の bind アドレス
        // given (前提条件):
        let config = ServerConfig::default();

        // when (操作):
        let addr = config.bind_addr();

        // then (期待する結果):
        assert_eq!(addr, "127.0.0.1:8080");
        assert_eq!(config.matchmaking.max_attempts, 32);
    }
}
