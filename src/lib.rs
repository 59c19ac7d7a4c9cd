// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Metanest World Contract Engine

pub mod core_types;
pub mod error;
pub mod config;
pub mod ids;
pub mod registry;
pub mod activity;
pub mod portal;
pub mod contract;
pub mod chain;
pub mod audit;

pub use core_types::*;
pub use error::{ContractError, TextError};
pub use config::ContractConfig;
pub use registry::World;
pub use activity::Activity;
pub use portal::{Portal, PortalKey};
pub use contract::{Call, CallResult, MetanestWorld, Value};
pub use chain::{Block, Chain, Receipt, ReceiptError, Tx};

use wasm_bindgen::prelude::*;

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl MetanestWorld {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        Self::default()
    }

    /// Build with text bounds taken from a plain JS object.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn js_with_config(config: JsValue) -> Result<MetanestWorld, JsValue> {
        let config: ContractConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        config
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::with_config(config))
    }

    #[wasm_bindgen(js_name = createWorld)]
    pub fn js_create_world(&mut self, caller: &str, name: &str, description: &str) -> JsValue {
        let result = self.call(&caller.into(), Call::CreateWorld {
            name: name.to_string(),
            description: description.to_string(),
        });
        serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(js_name = getWorldData)]
    pub fn js_get_world_data(&self, world_id: u64) -> JsValue {
        match self.get_world(WorldId(world_id)) {
            Some(world) => serde_wasm_bindgen::to_value(world).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    #[wasm_bindgen(js_name = createActivity)]
    pub fn js_create_activity(
        &mut self,
        caller: &str,
        world_id: u64,
        name: &str,
        description: &str,
        reward: i64,
    ) -> JsValue {
        let result = self.call(&caller.into(), Call::CreateActivity {
            world_id: WorldId(world_id),
            name: name.to_string(),
            description: description.to_string(),
            reward: i128::from(reward),
        });
        serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(js_name = participateActivity)]
    pub fn js_participate_activity(&mut self, caller: &str, world_id: u64, activity_id: u64) -> JsValue {
        let result = self.call(&caller.into(), Call::ParticipateActivity {
            world_id: WorldId(world_id),
            activity_id: ActivityId(activity_id),
        });
        serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(js_name = getActivityData)]
    pub fn js_get_activity_data(&self, world_id: u64, activity_id: u64) -> JsValue {
        match self.get_activity(WorldId(world_id), ActivityId(activity_id)) {
            Some(activity) => serde_wasm_bindgen::to_value(activity).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    #[wasm_bindgen(js_name = createPortal)]
    pub fn js_create_portal(&mut self, caller: &str, world_a: u64, world_b: u64) -> JsValue {
        let result = self.call(&caller.into(), Call::CreatePortal {
            world_a: WorldId(world_a),
            world_b: WorldId(world_b),
        });
        serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(js_name = getPortalData)]
    pub fn js_get_portal_data(&self, world_a: u64, world_b: u64) -> JsValue {
        match self.get_portal(WorldId(world_a), WorldId(world_b)) {
            Some(portal) => serde_wasm_bindgen::to_value(portal).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    /// Generic entry point: `call` is a serialized [`Call`]. Arguments that do
    /// not decode are reported as `invalid-input`.
    #[wasm_bindgen(js_name = call)]
    pub fn js_call(&mut self, caller: &str, call: JsValue) -> JsValue {
        let result = match serde_wasm_bindgen::from_value::<Call>(call) {
            Ok(call) => self.call(&caller.into(), call),
            Err(e) => {
                tracing::debug!(caller, "undecodable call: {e}");
                CallResult::Err(ContractError::InvalidInput)
            }
        };
        serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(js_name = lastWorldId)]
    pub fn js_last_world_id(&self) -> u64 {
        self.last_world_id()
    }
}
