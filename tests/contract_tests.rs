#[cfg(test)]
mod tests {
    use metanest_world::audit;
    use metanest_world::{
        ActivityId, Call, CallResult, Chain, ContractConfig, ContractError, MetanestWorld, Principal,
        RewardAmount, Tx, Value, WorldId,
    };
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn create_world(name: &str, description: &str) -> Call {
        Call::CreateWorld { name: name.into(), description: description.into() }
    }

    fn create_activity(world: u64, name: &str, reward: i128) -> Call {
        Call::CreateActivity {
            world_id: WorldId(world),
            name: name.into(),
            description: "Earn rewards".into(),
            reward,
        }
    }

    fn participate(world: u64, activity: u64) -> Call {
        Call::ParticipateActivity { world_id: WorldId(world), activity_id: ActivityId(activity) }
    }

    fn portal(a: u64, b: u64) -> Call {
        Call::CreatePortal { world_a: WorldId(a), world_b: WorldId(b) }
    }

    fn get_portal(a: u64, b: u64) -> Call {
        Call::GetPortalData { world_a: WorldId(a), world_b: WorldId(b) }
    }

    fn wallet(chain: &Chain, name: &str) -> Principal {
        chain.account(name).cloned().expect("test: account exists")
    }

    // ========== Receipt Scenarios ==========

    #[test]
    fn test_create_and_read_world() {
        let mut chain = Chain::new();
        let deployer = chain.deployer();

        let block = chain.mine_block(vec![
            Tx::contract_call(create_world("Test World", "A test world"), deployer.clone()),
        ]);
        assert_eq!(block.height, 1);
        assert_eq!(block.receipts.len(), 1);
        let id = block.receipts[0].expect_ok().expect("test: ok").as_uint();
        assert_eq!(id, Some(1));

        let block = chain.mine_block(vec![
            Tx::contract_call(Call::GetWorldData { world_id: WorldId(1) }, deployer.clone()),
        ]);
        let world = block.receipts[0]
            .expect_some()
            .expect("test: some")
            .as_world()
            .cloned()
            .expect("test: world value");
        assert_eq!(world.name, "Test World");
        assert_eq!(world.description, "A test world");
        assert_eq!(world.owner, deployer);
        assert_eq!(world.activity_count, 0);
        assert_eq!(world.total_rewards, RewardAmount(0));
    }

    #[test]
    fn test_activity_participation_rewards() {
        let mut chain = Chain::new();
        let deployer = chain.deployer();
        let player = wallet(&chain, "wallet_1");

        chain.mine_block(vec![
            Tx::contract_call(create_world("Test World", "A test world"), deployer.clone()),
            Tx::contract_call(create_activity(1, "Test Activity", 100), deployer.clone()),
        ]);
        let block = chain.mine_block(vec![Tx::contract_call(participate(1, 1), player.clone())]);
        assert!(block.receipts[0].expect_ok().is_ok());

        let block = chain.mine_block(vec![
            Tx::contract_call(
                Call::GetActivityData { world_id: WorldId(1), activity_id: ActivityId(1) },
                deployer.clone(),
            ),
            Tx::contract_call(Call::GetWorldData { world_id: WorldId(1) }, deployer.clone()),
            Tx::contract_call(Call::GetParticipantRewards { principal: player }, deployer),
        ]);
        let activity = block.receipts[0].expect_some().expect("test: activity").as_activity().cloned();
        assert_eq!(activity.map(|a| a.participants), Some(1));
        let world = block.receipts[1].expect_some().expect("test: world").as_world().cloned();
        assert_eq!(world.map(|w| w.total_rewards), Some(RewardAmount(100)));
        assert_eq!(block.receipts[2].expect_ok().ok().and_then(Value::as_uint), Some(100));
    }

    #[test]
    fn test_portal_lookup_is_order_independent() {
        let mut chain = Chain::new();
        let deployer = chain.deployer();

        chain.mine_block(vec![
            Tx::contract_call(create_world("World 1", "First world"), deployer.clone()),
            Tx::contract_call(create_world("World 2", "Second world"), deployer.clone()),
        ]);
        let block = chain.mine_block(vec![Tx::contract_call(portal(1, 2), deployer.clone())]);
        assert!(block.receipts[0].expect_ok().is_ok());

        let block = chain.mine_block(vec![
            Tx::contract_call(get_portal(1, 2), deployer.clone()),
            Tx::contract_call(get_portal(2, 1), deployer.clone()),
            Tx::contract_call(get_portal(3, 4), deployer),
        ]);
        let forward = block.receipts[0].expect_some().expect("test: forward").clone();
        let backward = block.receipts[1].expect_some().expect("test: backward").clone();
        assert_eq!(forward, backward);
        let p = forward.as_portal().expect("test: portal value");
        assert_eq!((p.world_a, p.world_b), (WorldId(1), WorldId(2)));
        assert!(block.receipts[2].expect_none().is_ok());
    }

    // ========== Ledger Properties ==========

    #[test]
    fn test_world_ids_strictly_increase() {
        let mut chain = Chain::new();
        let txs = (0..20)
            .map(|i| Tx::contract_call(create_world(&format!("W{i}"), ""), chain.deployer()))
            .collect();
        let block = chain.mine_block(txs);
        let ids: Vec<u128> = block
            .receipts
            .iter()
            .filter_map(|r| r.expect_ok().ok().and_then(Value::as_uint))
            .collect();
        assert_eq!(ids, (1..=20).collect::<Vec<u128>>());
        assert_eq!(chain.contract().last_world_id(), 20);
    }

    #[test]
    fn test_unknown_references_fail_without_mutation() {
        let mut chain = Chain::new();
        let deployer = chain.deployer();
        chain.mine_block(vec![
            Tx::contract_call(create_world("Only", "one"), deployer.clone()),
            Tx::contract_call(create_activity(1, "Quest", 5), deployer.clone()),
        ]);
        let before = chain.contract().get_world(WorldId(1)).cloned();

        let block = chain.mine_block(vec![
            Tx::contract_call(create_activity(9, "Ghost", 5), deployer.clone()),
            Tx::contract_call(participate(1, 2), deployer.clone()),
            Tx::contract_call(participate(9, 1), deployer.clone()),
            Tx::contract_call(portal(1, 9), deployer),
        ]);
        for receipt in &block.receipts {
            assert_eq!(receipt.expect_err().ok(), Some(ContractError::NotFound), "{}", receipt.function);
        }
        assert_eq!(chain.contract().get_world(WorldId(1)).cloned(), before);
        assert!(chain.contract().portals().is_empty());
        assert_eq!(chain.contract().activities().len(), 1);
    }

    #[test]
    fn test_rewards_scale_with_participations() {
        let mut chain = Chain::new();
        let deployer = chain.deployer();
        chain.mine_block(vec![
            Tx::contract_call(create_world("Colosseum", "pvp"), deployer.clone()),
            Tx::contract_call(create_activity(1, "Duel", 25), deployer.clone()),
        ]);
        let players: Vec<Principal> = chain.accounts().cloned().collect();
        let txs: Vec<Tx> = players
            .iter()
            .cycle()
            .take(12)
            .map(|p| Tx::contract_call(participate(1, 1), p.clone()))
            .collect();
        let block = chain.mine_block(txs);
        assert_eq!(block.ok_count(), 12);

        let contract = chain.contract();
        assert_eq!(contract.get_activity(WorldId(1), ActivityId(1)).map(|a| a.participants), Some(12));
        assert_eq!(contract.get_world(WorldId(1)).map(|w| w.total_rewards), Some(RewardAmount(300)));
        assert!(audit::verify(contract).is_ok());
    }

    #[test]
    fn test_portal_rules() {
        let mut chain = Chain::new();
        let deployer = chain.deployer();
        let stranger = wallet(&chain, "wallet_3");
        chain.mine_block(vec![
            Tx::contract_call(create_world("A", "a"), deployer.clone()),
            Tx::contract_call(create_world("B", "b"), deployer.clone()),
        ]);

        let block = chain.mine_block(vec![
            Tx::contract_call(portal(1, 1), deployer.clone()),
            Tx::contract_call(portal(2, 1), stranger.clone()),
            Tx::contract_call(portal(1, 2), deployer.clone()),
            Tx::contract_call(portal(2, 1), deployer),
        ]);
        assert_eq!(block.receipts[0].expect_err().ok(), Some(ContractError::InvalidInput));
        assert!(block.receipts[1].expect_ok().is_ok());
        assert_eq!(block.receipts[2].expect_err().ok(), Some(ContractError::AlreadyExists));
        assert_eq!(block.receipts[3].expect_err().ok(), Some(ContractError::AlreadyExists));

        let stored = chain.contract().get_portal(WorldId(1), WorldId(2)).cloned();
        assert_eq!(stored.map(|p| p.creator), Some(stranger));
        assert_eq!(chain.contract().world_portals(WorldId(2)), Some(vec![WorldId(1)]));
    }

    #[test]
    fn test_activity_creation_is_owner_only() {
        let mut chain = Chain::new();
        let deployer = chain.deployer();
        let intruder = wallet(&chain, "wallet_2");
        chain.mine_block(vec![Tx::contract_call(create_world("Home", "mine"), deployer)]);

        let block = chain.mine_block(vec![
            Tx::contract_call(create_activity(1, "Heist", 10), intruder.clone()),
            Tx::contract_call(create_activity(1, "Heist", -10), intruder),
        ]);
        assert_eq!(block.receipts[0].expect_err().ok(), Some(ContractError::Unauthorized));
        assert_eq!(block.receipts[1].expect_err().ok(), Some(ContractError::InvalidInput));
        assert_eq!(chain.contract().get_world(WorldId(1)).map(|w| w.activity_count), Some(0));
    }

    #[test]
    fn test_text_limits_follow_config() {
        let config = ContractConfig::from_json_str(r#"{"max-name-len": 4}"#).expect("test: config");
        let mut chain = Chain::with_contract(MetanestWorld::with_config(config));
        let deployer = chain.deployer();
        let block = chain.mine_block(vec![
            Tx::contract_call(create_world("Tiny", "description may be longer"), deployer.clone()),
            Tx::contract_call(create_world("Large", "d"), deployer.clone()),
            Tx::contract_call(create_world("Caf\u{e9}", "d"), deployer),
        ]);
        assert!(block.receipts[0].expect_ok().is_ok());
        assert_eq!(block.receipts[1].expect_err().ok(), Some(ContractError::InvalidInput));
        assert_eq!(block.receipts[2].expect_err().ok(), Some(ContractError::InvalidInput));
        assert_eq!(chain.contract().last_world_id(), 1);
    }

    // ========== Randomized Audit ==========

    #[test]
    fn test_random_traffic_keeps_ledger_consistent() {
        let mut rng = ChaCha8Rng::seed_from_u64(2026);
        let mut chain = Chain::new();
        let accounts: Vec<Principal> = chain.accounts().cloned().collect();

        for _ in 0..40 {
            let last = chain.contract().last_world_id();
            let txs: Vec<Tx> = (0..15)
                .map(|_| {
                    let sender = accounts[rng.gen_range(0..accounts.len())].clone();
                    let world = rng.gen_range(0..=last + 1);
                    let call = match rng.gen_range(0..5) {
                        0 => create_world("W", "generated"),
                        1 => create_activity(world, "A", rng.gen_range(-5..=500)),
                        2 => participate(world, rng.gen_range(0..=3)),
                        3 => portal(world, rng.gen_range(0..=last + 1)),
                        _ => Call::GetWorldPortals { world_id: WorldId(world) },
                    };
                    Tx::contract_call(call, sender)
                })
                .collect();
            chain.mine_block(txs);
            if let Err(e) = audit::verify(chain.contract()) {
                panic!("audit failed at height {}: {e}", chain.block_height());
            }
        }
        assert_eq!(chain.block_height(), 40);
    }

    // ========== Wire Format ==========

    #[test]
    fn test_call_wire_shape() {
        let call: Call = serde_json::from_str(
            r#"{"create-activity": {"world-id": 3, "name": "Quest", "description": "q", "reward": 100}}"#,
        )
        .expect("test: decode");
        assert_eq!(call, Call::CreateActivity {
            world_id: WorldId(3),
            name: "Quest".into(),
            description: "q".into(),
            reward: 100,
        });

        let unit: Call = serde_json::from_str(r#""get-last-world-id""#).expect("test: unit call");
        assert_eq!(unit, Call::GetLastWorldId);
        assert!(unit.is_read_only());
    }

    #[test]
    fn test_result_wire_shape() {
        let mut contract = MetanestWorld::new();
        let deployer = Principal::from("deployer");
        let created = contract.call(&deployer, create_world("Test World", "A test world"));
        assert_eq!(serde_json::to_value(&created).expect("test: ok"), serde_json::json!({"ok": {"uint": 1}}));

        let world = contract.call(&deployer, Call::GetWorldData { world_id: WorldId(1) });
        let json = serde_json::to_value(&world).expect("test: world");
        assert_eq!(json["some"]["world"]["activity-count"], 0);
        assert_eq!(json["some"]["world"]["owner"], "deployer");

        let missing = contract.call(&deployer, get_portal(1, 2));
        assert_eq!(missing, CallResult::None);
        assert_eq!(serde_json::to_value(&missing).expect("test: none"), serde_json::json!("none"));

        let rejected = contract.call(&deployer, portal(1, 1));
        assert_eq!(serde_json::to_value(&rejected).expect("test: err"), serde_json::json!({"err": "invalid-input"}));
    }
}
