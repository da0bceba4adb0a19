//! UE context release through the per-UE task scheduler
//!
//! Drives the release routine the way the CU-CP does in production: as an
//! async task scheduled on the executor of the peer connection that serves
//! the UE.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gnbcu_common::config::DispatchRetryConfig;
    use gnbcu_common::{PduSessionId, UeIndex};
    use gnbcu_cucp::async_task::ManualEvent;
    use gnbcu_cucp::cause::{NgapCause, NgapCauseNas, NgapCauseRadioNetwork};
    use gnbcu_cucp::manager::{ConnectionRequest, DuConnectionManager, PeerConnectionManager};
    use gnbcu_cucp::messages::{UeContextReleaseCommand, UeContextReleaseComplete};
    use gnbcu_cucp::routines::UeContextReleaseRoutine;

    use crate::mock_peers::MockUePeers;
    use crate::test_utils::init_test_logging;

    fn release_routine(
        ue_index: UeIndex,
        cause: NgapCause,
        peers: &Arc<MockUePeers>,
    ) -> UeContextReleaseRoutine {
        UeContextReleaseRoutine::new(
            UeContextReleaseCommand { ue_index, cause },
            peers.clone(),
            peers.clone(),
            peers.clone(),
            peers.clone(),
            peers.clone(),
        )
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_release_on_peer_connection_scheduler() {
        init_test_logging();
        let mng: DuConnectionManager =
            PeerConnectionManager::new("du", 2, 64, DispatchRetryConfig::default());
        let index = mng.add(ConnectionRequest { name: "du-0".into() }).unwrap();
        let sched = mng.scheduler(index).unwrap();

        let peers = MockUePeers::new(vec![PduSessionId(1), PduSessionId(2)]);
        let routine = release_routine(
            UeIndex(1),
            NgapCause::Nas(NgapCauseNas::NormalRelease),
            &peers,
        );

        let result = ManualEvent::<UeContextReleaseComplete>::new();
        let r = result.clone();
        sched.schedule_async_task(UeIndex(1), async move {
            r.set(routine.run().await);
        });

        let complete = result.wait().await;
        assert_eq!(complete.ue_index, UeIndex(1));
        assert_eq!(
            complete.pdu_session_res_list,
            vec![PduSessionId(1), PduSessionId(2)]
        );
        assert_eq!(
            peers.calls(),
            vec!["bearer_release", "ue_context_release", "removal_required:ue=1"]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_releases_for_distinct_ues_both_complete() {
        init_test_logging();
        let mng: DuConnectionManager =
            PeerConnectionManager::new("du", 2, 64, DispatchRetryConfig::default());
        let index = mng.add(ConnectionRequest { name: "du-0".into() }).unwrap();
        let sched = mng.scheduler(index).unwrap();

        let peers = MockUePeers::new(Vec::new());
        let mut results = Vec::new();
        for raw in [1u32, 2] {
            let routine = release_routine(
                UeIndex(raw),
                NgapCause::RadioNetwork(NgapCauseRadioNetwork::ReleaseDueToNgranGeneratedReason),
                &peers,
            );
            let result = ManualEvent::<UeContextReleaseComplete>::new();
            let r = result.clone();
            sched.schedule_async_task(UeIndex(raw), async move {
                r.set(routine.run().await);
            });
            results.push(result);
        }

        for (result, raw) in results.into_iter().zip([1u32, 2]) {
            let complete = result.wait().await;
            assert_eq!(complete.ue_index, UeIndex(raw));
            assert!(complete.pdu_session_res_list.is_empty());
        }

        // No active sessions, so no bearer release on either UE.
        let calls = peers.calls();
        assert_eq!(
            calls.iter().filter(|c| *c == "ue_context_release").count(),
            2
        );
        assert!(!calls.iter().any(|c| c == "bearer_release"));
    }
}
