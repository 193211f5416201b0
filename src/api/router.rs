//! Transport-agnostic request dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, error};

use crate::api::wire::{
    self, AuthedRequest, BattleFinishRequest, BattleSelectRequest, BattleStartRequest,
    SessionStartRequest, UpgradeRequest,
};
use crate::engine::Engine;
use crate::error::{EngineError, EngineResult, Resource};
use crate::mission::mission_for;

/// Status code plus JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Value,
}

impl ApiResponse {
    fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn not_found() -> Self {
        Self {
            status: 404,
            body: json!({ "error": "not_found" }),
        }
    }

    /// Map an engine failure to its wire form.
    #[must_use]
    pub fn from_error(e: &EngineError) -> Self {
        let (status, body) = match e {
            EngineError::Unauthorized => (401, json!({ "error": "unauthorized" })),
            EngineError::InsufficientResource {
                resource,
                need,
                have,
            } => {
                let code = match resource {
                    Resource::Energy => "insufficient_energy",
                    Resource::JetFuel => "insufficient_jetfuel",
                };
                (400, json!({ "error": code, "need": need, "have": have }))
            }
            EngineError::InvalidRequest(detail) => {
                (400, json!({ "error": "invalid_request", "detail": detail }))
            }
            EngineError::BattleNotActive => (409, json!({ "error": "battle_not_active" })),
            EngineError::Storage(inner) => {
                error!(error = %inner, "store failure");
                (500, json!({ "error": "internal" }))
            }
        };
        Self { status, body }
    }
}

fn parse_body<T: DeserializeOwned>(body: &str) -> EngineResult<T> {
    serde_json::from_str(body).map_err(|e| EngineError::invalid(format!("bad body: {e}")))
}

fn to_json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn split_url(url: &str) -> (&str, HashMap<&str, &str>) {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    let params = query
        .split('&')
        .filter(|kv| !kv.is_empty())
        .map(|kv| kv.split_once('=').unwrap_or((kv, "")))
        .collect();
    (path.trim_matches('/'), params)
}

fn param<'a>(params: &HashMap<&str, &'a str>, key: &str) -> EngineResult<&'a str> {
    params
        .get(key)
        .copied()
        .ok_or_else(|| EngineError::invalid(format!("missing query parameter '{key}'")))
}

/// Routes requests to an [`Engine`].
#[derive(Debug, Clone)]
pub struct Router {
    engine: Arc<Engine>,
}

impl Router {
    /// Route to `engine`.
    #[must_use]
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }

    /// The engine behind this router.
    #[must_use]
    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    /// Handle one request. `url` may carry a query string.
    #[must_use]
    pub fn handle(&self, method: &str, url: &str, body: &str) -> ApiResponse {
        let (path, params) = split_url(url);
        debug!(method, path, "request");
        let result = match (method, path) {
            ("POST", "session/start") => self.session_start(body),
            ("GET", "profile") => self.profile(&params),
            ("POST", "battle/start") => self.battle_start(body),
            ("POST", "battle/select") => self.battle_select(body),
            ("POST", "battle/turn") => self.battle_turn(body),
            ("POST", "battle/restart") => self.battle_restart(body),
            ("POST", "battle/finish") => self.battle_finish(body),
            ("GET", "battle") => self.battle_status(&params),
            ("POST", "ms/upgrade") => self.upgrade(body),
            ("POST", "ms/quote") => self.quote(body),
            ("GET", "mission") => Self::mission(&params),
            _ => return ApiResponse::not_found(),
        };
        match result {
            Ok(body) => ApiResponse::ok(body),
            Err(e) => ApiResponse::from_error(&e),
        }
    }

    fn session_start(&self, body: &str) -> EngineResult<Value> {
        let req: SessionStartRequest = parse_body(body)?;
        let nonce = self.engine.start_session(&wire::address(&req.address)?)?;
        Ok(json!({ "nonce": nonce }))
    }

    fn profile(&self, params: &HashMap<&str, &str>) -> EngineResult<Value> {
        let address = wire::address(param(params, "address")?)?;
        Ok(to_json(&self.engine.profile(&address)?))
    }

    fn battle_start(&self, body: &str) -> EngineResult<Value> {
        let req: BattleStartRequest = parse_body(body)?;
        let address = wire::address(&req.address)?;
        let receipt =
            self.engine
                .start_battle(&address, req.nonce.as_deref(), req.wave, req.squad)?;
        Ok(json!({ "ok": true, "energy": receipt.energy, "battle": receipt.battle }))
    }

    fn battle_select(&self, body: &str) -> EngineResult<Value> {
        let req: BattleSelectRequest = parse_body(body)?;
        let address = wire::address(&req.address)?;
        let battle =
            self.engine
                .select_battle(&address, req.nonce.as_deref(), req.wave, req.squad)?;
        Ok(json!({ "ok": true, "battle": battle }))
    }

    fn battle_turn(&self, body: &str) -> EngineResult<Value> {
        let req: AuthedRequest = parse_body(body)?;
        let receipt = self
            .engine
            .take_turn(&wire::address(&req.address)?, req.nonce.as_deref())?;
        let mut value = to_json(&receipt);
        if let Value::Object(map) = &mut value {
            map.insert("ok".into(), Value::Bool(true));
        }
        Ok(value)
    }

    fn battle_restart(&self, body: &str) -> EngineResult<Value> {
        let req: AuthedRequest = parse_body(body)?;
        let battle = self
            .engine
            .restart_battle(&wire::address(&req.address)?, req.nonce.as_deref())?;
        Ok(json!({ "ok": true, "battle": battle }))
    }

    fn battle_finish(&self, body: &str) -> EngineResult<Value> {
        let req: BattleFinishRequest = parse_body(body)?;
        let (settlement, profile) = self.engine.finish_battle(
            &wire::address(&req.address)?,
            req.nonce.as_deref(),
            req.report,
        )?;
        Ok(json!({ "ok": true, "settlement": settlement, "profile": profile }))
    }

    fn battle_status(&self, params: &HashMap<&str, &str>) -> EngineResult<Value> {
        let address = wire::address(param(params, "address")?)?;
        Ok(json!({ "battle": self.engine.battle_status(&address)? }))
    }

    fn upgrade(&self, body: &str) -> EngineResult<Value> {
        let req: UpgradeRequest = parse_body(body)?;
        let address = wire::address(&req.address)?;
        let ops = req.ops()?;
        let (quote, profile) = self
            .engine
            .apply_upgrade(&address, req.nonce.as_deref(), &ops)?;
        Ok(json!({
            "ok": true,
            "applied": quote.applied,
            "cost": quote.total_cost,
            "headroomExhausted": quote.headroom_exhausted,
            "profile": profile,
        }))
    }

    fn quote(&self, body: &str) -> EngineResult<Value> {
        let req: UpgradeRequest = parse_body(body)?;
        let address = wire::address(&req.address)?;
        let ops = req.ops()?;
        Ok(to_json(&self.engine.quote_upgrade(&address, &ops)?))
    }

    fn mission(params: &HashMap<&str, &str>) -> EngineResult<Value> {
        let level: u32 = param(params, "level")?
            .parse()
            .map_err(|_| EngineError::invalid("level must be a non-negative integer"))?;
        Ok(to_json(&mission_for(level)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::EconomyConfig;
    use crate::rng::SeededRolls;
    use crate::store::MemoryStore;

    fn router() -> Router {
        Router::new(Arc::new(Engine::new(
            Arc::new(MemoryStore::new()),
            Arc::new(ManualClock::new(0)),
            Box::new(SeededRolls::new(1)),
            EconomyConfig::default(),
        )))
    }

    #[test]
    fn test_split_url() {
        let (path, params) = split_url("/profile?address=AB12&x=");
        assert_eq!(path, "profile");
        assert_eq!(params.get("address"), Some(&"AB12"));
        assert_eq!(params.get("x"), Some(&""));
    }

    #[test]
    fn test_unknown_route() {
        let r = router().handle("GET", "/nowhere", "");
        assert_eq!(r.status, 404);
        assert_eq!(r.body["error"], "not_found");
    }

    #[test]
    fn test_bad_body_is_invalid_request() {
        let r = router().handle("POST", "/session/start", "{");
        assert_eq!(r.status, 400);
        assert_eq!(r.body["error"], "invalid_request");
    }

    #[test]
    fn test_missing_nonce_unauthorized() {
        let router = router();
        let _ = router.handle("POST", "/session/start", r#"{"address":"AB12"}"#);
        let r = router.handle("POST", "/battle/start", r#"{"address":"AB12"}"#);
        assert_eq!(r.status, 401);
        assert_eq!(r.body, json!({ "error": "unauthorized" }));
    }

    #[test]
    fn test_upgrade_with_same_stat_twice_is_rejected() {
        let router = router();
        let login = router.handle("POST", "/session/start", r#"{"address":"AB12"}"#);
        let nonce = login.body["nonce"].as_str().unwrap().to_string();
        let body = json!({
            "address": "AB12",
            "nonce": nonce,
            "ops": { "health": u32::MAX, "HEALTH": 1 },
        });
        let r = router.handle("POST", "/ms/upgrade", &body.to_string());
        assert_eq!(r.status, 400);
        assert_eq!(r.body["error"], "invalid_request");

        let profile = router.handle("GET", "/profile?address=AB12", "");
        assert_eq!(profile.body["jetFuel"], 100);
        assert_eq!(profile.body["ms"]["level"]["health"], 0);
    }

    #[test]
    fn test_mission_lookup() {
        let r = router().handle("GET", "/mission?level=6", "");
        assert_eq!(r.status, 200);
        assert_eq!(r.body["enemyHp"], 29);
    }
}
