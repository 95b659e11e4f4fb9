/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: request gate + authorization table, http: 横断的な transport 設定
 */
pub mod auth;
pub mod http;
