//! Typed handles for the three cluster daemons
//!
//! Ports are parsed from the command line once, at construction time.

use std::fmt;
use std::sync::Arc;

use shared::{CommandLine, DaemonKind};
use tracing::info;

use crate::error::ClusterResult;
use crate::runtime::context::ClusterContext;
use crate::runtime::endpoint::{CatalogdService, ImpaladService, StatestoredService, WebEndpoint};
use crate::runtime::process::{ClusterProcess, Process};

pub const WEBSERVER_PORT_FLAG: &str = "webserver_port";
pub const BEESWAX_PORT_FLAG: &str = "beeswax_port";
pub const BE_PORT_FLAG: &str = "be_port";
pub const HS2_PORT_FLAG: &str = "hs2_port";
pub const CATALOG_SERVICE_PORT_FLAG: &str = "catalog_service_port";

pub const IMPALAD_READY_METRIC: &str = "impala-server.ready";
pub const CATALOGD_READY_METRIC: &str = "statestore-subscriber.connected";

fn web_endpoint(cmd: &CommandLine, default_port: u16, ctx: &Arc<ClusterContext>) -> ClusterResult<WebEndpoint> {
    let port = cmd.port(WEBSERVER_PORT_FLAG, Some(default_port))?;
    Ok(WebEndpoint::new(ctx.config.hostname.clone(), port, ctx.clone()))
}

/// Coordinator daemon
#[derive(Clone)]
pub struct ImpaladProcess {
    process: Process,
    service: ImpaladService,
}

impl ImpaladProcess {
    pub const DEFAULT_WEBSERVER_PORT: u16 = 25000;
    pub const DEFAULT_BEESWAX_PORT: u16 = 21000;
    pub const DEFAULT_BE_PORT: u16 = 22000;
    pub const DEFAULT_HS2_PORT: u16 = 21050;

    pub fn new(cmd: CommandLine, ctx: Arc<ClusterContext>) -> ClusterResult<Self> {
        let web = web_endpoint(&cmd, Self::DEFAULT_WEBSERVER_PORT, &ctx)?;
        let service = ImpaladService::new(
            web,
            cmd.port(BEESWAX_PORT_FLAG, Some(Self::DEFAULT_BEESWAX_PORT))?,
            cmd.port(BE_PORT_FLAG, Some(Self::DEFAULT_BE_PORT))?,
            cmd.port(HS2_PORT_FLAG, Some(Self::DEFAULT_HS2_PORT))?,
        );

        Ok(Self {
            process: Process::new(cmd, ctx),
            service,
        })
    }

    pub fn service(&self) -> &ImpaladService {
        &self.service
    }
}

#[async_trait::async_trait]
impl ClusterProcess for ImpaladProcess {
    fn process(&self) -> &Process {
        &self.process
    }

    /// Relaunch through the start script, then wait for the server to report ready
    async fn start(&self, wait_until_ready: bool) -> ClusterResult<()> {
        let ctx = self.process.context();
        info!(parent: &ctx.span, "Starting Impalad process: {}", self.process.cmd());
        self.process.launch_with(ctx.config.coordinator_launcher())?;

        if wait_until_ready {
            self.service
                .web()
                .wait_for_metric_value(IMPALAD_READY_METRIC, 1, ctx.config.ready_timeout)
                .await?;
        }
        Ok(())
    }
}

/// Cluster membership daemon
#[derive(Clone)]
pub struct StatestoredProcess {
    process: Process,
    service: StatestoredService,
}

impl StatestoredProcess {
    pub const DEFAULT_WEBSERVER_PORT: u16 = 25010;

    pub fn new(cmd: CommandLine, ctx: Arc<ClusterContext>) -> ClusterResult<Self> {
        let service = StatestoredService::new(web_endpoint(&cmd, Self::DEFAULT_WEBSERVER_PORT, &ctx)?);
        Ok(Self {
            process: Process::new(cmd, ctx),
            service,
        })
    }

    pub fn service(&self) -> &StatestoredService {
        &self.service
    }
}

#[async_trait::async_trait]
impl ClusterProcess for StatestoredProcess {
    fn process(&self) -> &Process {
        &self.process
    }
}

/// Catalog daemon
#[derive(Clone)]
pub struct CatalogdProcess {
    process: Process,
    service: CatalogdService,
}

impl CatalogdProcess {
    pub const DEFAULT_WEBSERVER_PORT: u16 = 25020;
    pub const DEFAULT_SERVICE_PORT: u16 = 26000;

    pub fn new(cmd: CommandLine, ctx: Arc<ClusterContext>) -> ClusterResult<Self> {
        let web = web_endpoint(&cmd, Self::DEFAULT_WEBSERVER_PORT, &ctx)?;
        let service = CatalogdService::new(
            web,
            cmd.port(CATALOG_SERVICE_PORT_FLAG, Some(Self::DEFAULT_SERVICE_PORT))?,
        );

        Ok(Self {
            process: Process::new(cmd, ctx),
            service,
        })
    }

    pub fn service(&self) -> &CatalogdService {
        &self.service
    }
}

#[async_trait::async_trait]
impl ClusterProcess for CatalogdProcess {
    fn process(&self) -> &Process {
        &self.process
    }

    /// Relaunch through the start script, then wait for the statestore subscription
    async fn start(&self, wait_until_ready: bool) -> ClusterResult<()> {
        let ctx = self.process.context();
        info!(parent: &ctx.span, "Starting Catalogd process: {}", self.process.cmd());
        self.process.launch_with(ctx.config.catalog_launcher())?;

        if wait_until_ready {
            self.service
                .web()
                .wait_for_metric_value(CATALOGD_READY_METRIC, 1, ctx.config.ready_timeout)
                .await?;
        }
        Ok(())
    }
}

macro_rules! impl_daemon_traits {
    ($($ty:ident),*) => {$(
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                self.process == other.process
            }
        }

        impl Eq for $ty {}

        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($ty))
                    .field("cmd", self.process.cmd())
                    .field("ports", &self.service.ports())
                    .finish()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.process, f)
            }
        }
    )*};
}

impl_daemon_traits!(ImpaladProcess, StatestoredProcess, CatalogdProcess);

/// Build the handle matching `kind`
pub fn build_daemon(kind: DaemonKind, cmd: CommandLine, ctx: Arc<ClusterContext>) -> ClusterResult<DaemonProcess> {
    Ok(match kind {
        DaemonKind::Impalad => DaemonProcess::Impalad(ImpaladProcess::new(cmd, ctx)?),
        DaemonKind::Statestored => DaemonProcess::Statestored(StatestoredProcess::new(cmd, ctx)?),
        DaemonKind::Catalogd => DaemonProcess::Catalogd(CatalogdProcess::new(cmd, ctx)?),
    })
}

/// Any one of the cluster daemons
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaemonProcess {
    Impalad(ImpaladProcess),
    Statestored(StatestoredProcess),
    Catalogd(CatalogdProcess),
}

impl DaemonProcess {
    pub fn kind(&self) -> DaemonKind {
        match self {
            DaemonProcess::Impalad(_) => DaemonKind::Impalad,
            DaemonProcess::Statestored(_) => DaemonKind::Statestored,
            DaemonProcess::Catalogd(_) => DaemonKind::Catalogd,
        }
    }

    pub fn as_cluster_process(&self) -> &dyn ClusterProcess {
        match self {
            DaemonProcess::Impalad(p) => p,
            DaemonProcess::Statestored(p) => p,
            DaemonProcess::Catalogd(p) => p,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClusterConfig;
    use crate::error::ClusterError;
    use crate::traits::{MetricMap, MockMetricSource, MockProcessLauncher};
    use shared::SharedError;
    use std::time::Duration;

    fn context(launcher: MockProcessLauncher, metrics: MockMetricSource) -> Arc<ClusterContext> {
        let config = ClusterConfig::builder()
            .impala_home("/opt/impala")
            .hostname("node-1")
            .poll_interval(Duration::from_millis(5))
            .ready_timeout(Duration::from_millis(200))
            .build();
        ClusterContext::local(config)
            .unwrap()
            .with_launcher(Arc::new(launcher))
            .with_metric_source(Arc::new(metrics))
            .with_span(shared::logging::detached_span())
            .shared()
    }

    fn idle_context() -> Arc<ClusterContext> {
        context(MockProcessLauncher::new(), MockMetricSource::new())
    }

    fn cmd(args: &[&str]) -> CommandLine {
        CommandLine::new(args.iter().copied()).unwrap()
    }

    #[test]
    fn test_impalad_ports_from_command_line() {
        let impalad = ImpaladProcess::new(
            cmd(&[
                "impalad",
                "--webserver_port=25000",
                "--beeswax_port=21000",
                "--be_port=22000",
                "--hs2_port=21050",
            ]),
            idle_context(),
        )
        .unwrap();

        let service = impalad.service();
        assert_eq!(service.webserver_port(), 25000);
        assert_eq!(service.beeswax_port(), 21000);
        assert_eq!(service.be_port(), 22000);
        assert_eq!(service.hs2_port(), 21050);
        assert_eq!(service.hostname(), "node-1");
    }

    #[test]
    fn test_impalad_defaults_for_missing_flags() {
        let impalad = ImpaladProcess::new(cmd(&["impalad", "--be_port=22001"]), idle_context()).unwrap();

        let service = impalad.service();
        assert_eq!(service.webserver_port(), 25000);
        assert_eq!(service.beeswax_port(), 21000);
        assert_eq!(service.be_port(), 22001);
        assert_eq!(service.hs2_port(), 21050);
    }

    #[test]
    fn test_statestored_and_catalogd_defaults() {
        let statestored = StatestoredProcess::new(cmd(&["statestored"]), idle_context()).unwrap();
        assert_eq!(statestored.service().webserver_port(), 25010);

        let catalogd = CatalogdProcess::new(cmd(&["catalogd", "--catalog_service_port=26001"]), idle_context()).unwrap();
        assert_eq!(catalogd.service().webserver_port(), 25020);
        assert_eq!(catalogd.service().service_port(), 26001);
    }

    #[test]
    fn test_unparsable_port_is_rejected() {
        let result = CatalogdProcess::new(cmd(&["catalogd", "--catalog_service_port=x"]), idle_context());
        assert!(matches!(
            result,
            Err(ClusterError::Shared(SharedError::InvalidFlagValue { .. }))
        ));
    }

    #[tokio::test]
    async fn test_impalad_start_uses_launcher_and_waits_for_ready() {
        let mut launcher = MockProcessLauncher::new();
        launcher
            .expect_spawn_detached()
            .withf(|argv| {
                argv == [
                    "/opt/impala/bin/start-impalad.sh".to_string(),
                    "-build_type=latest".to_string(),
                    "--be_port=22000".to_string(),
                ]
            })
            .times(1)
            .returning(|_| Ok(()));

        let mut metrics = MockMetricSource::new();
        metrics
            .expect_fetch_metrics()
            .withf(|_, port| *port == 25000)
            .returning(|_, _| Ok(MetricMap::from([(IMPALAD_READY_METRIC.to_string(), serde_json::json!(1))])));

        let impalad = ImpaladProcess::new(cmd(&["impalad", "--be_port=22000"]), context(launcher, metrics)).unwrap();
        impalad.start(true).await.unwrap();
    }

    #[tokio::test]
    async fn test_catalogd_start_without_wait_skips_metrics() {
        let mut launcher = MockProcessLauncher::new();
        launcher
            .expect_spawn_detached()
            .withf(|argv| {
                argv == [
                    "/opt/impala/bin/start-catalogd.sh".to_string(),
                    "--catalog_service_port=26000".to_string(),
                ]
            })
            .times(1)
            .returning(|_| Ok(()));

        let mut metrics = MockMetricSource::new();
        metrics.expect_fetch_metrics().times(0);

        let catalogd = CatalogdProcess::new(
            cmd(&["/build/catalogd", "--catalog_service_port=26000"]),
            context(launcher, metrics),
        )
        .unwrap();
        catalogd.start(false).await.unwrap();
    }

    #[tokio::test]
    async fn test_catalogd_start_times_out_when_never_connected() {
        let mut launcher = MockProcessLauncher::new();
        launcher.expect_spawn_detached().returning(|_| Ok(()));

        let mut metrics = MockMetricSource::new();
        metrics
            .expect_fetch_metrics()
            .returning(|_, _| Ok(MetricMap::from([(CATALOGD_READY_METRIC.to_string(), serde_json::json!(false))])));

        let catalogd = CatalogdProcess::new(cmd(&["catalogd"]), context(launcher, metrics)).unwrap();
        assert!(matches!(
            catalogd.start(true).await,
            Err(ClusterError::MetricTimeout { .. })
        ));
    }

    #[tokio::test]
    async fn test_statestored_start_runs_stored_command() {
        let mut launcher = MockProcessLauncher::new();
        launcher
            .expect_spawn_detached()
            .withf(|argv| argv == ["statestored".to_string(), "--webserver_port=25010".to_string()])
            .times(1)
            .returning(|_| Ok(()));

        let statestored = StatestoredProcess::new(
            cmd(&["statestored", "--webserver_port=25010"]),
            context(launcher, MockMetricSource::new()),
        )
        .unwrap();
        statestored.start(true).await.unwrap();
    }

    #[test]
    fn test_build_daemon_by_kind() {
        let daemon = build_daemon(DaemonKind::Catalogd, cmd(&["catalogd"]), idle_context()).unwrap();
        assert_eq!(daemon.kind(), DaemonKind::Catalogd);
        assert_eq!(daemon.as_cluster_process().process().cmd().executable(), "catalogd");
    }

    #[test]
    fn test_equality_follows_command_line() {
        let ctx = idle_context();
        let a = ImpaladProcess::new(cmd(&["impalad", "--be_port=22000"]), ctx.clone()).unwrap();
        let b = ImpaladProcess::new(cmd(&["impalad", "--be_port=22000"]), ctx.clone()).unwrap();
        let c = ImpaladProcess::new(cmd(&["impalad", "--be_port=22001"]), ctx).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
