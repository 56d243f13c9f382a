use autometrics::autometrics;
use tracing::debug;

use super::Client;
use crate::utils::parse_port;
use crate::utils::split_host_port;
use crate::QueryMeta;
use crate::Result;
use crate::ServiceCheck;
use crate::ServiceEntry;
use crate::ServiceError;
use crate::ServiceRegistration;
use crate::Store;
use crate::API_SLO;

impl<S: Store> Client<S> {
    /// Registers `name` at `addr` (`host:port`) with the store's agent.
    ///
    /// The instance id is the service name. Health check timings come from
    /// [`crate::ServiceCheckConfig`].
    ///
    /// # Errors
    /// - [`ServiceError::InvalidServiceAddress`] when `addr` has no port part
    /// - [`ServiceError::InvalidPort`] when the port is not a valid number
    ///
    /// Both are raised before the store is contacted.
    #[cfg_attr(not(doc), autometrics(objective = API_SLO))]
    pub async fn register_service(
        &self,
        name: &str,
        addr: &str,
        tags: &[&str],
    ) -> Result<()> {
        let (host, port) = split_host_port(addr)?;
        let port = parse_port(&port)?;

        let check = &self.config.service_check;
        let registration = ServiceRegistration {
            id: name.to_string(),
            name: name.to_string(),
            address: host,
            port,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            check: ServiceCheck {
                ttl: check.ttl(),
                deregister_critical_after: check.deregister_critical_after(),
            },
        };
        debug!(?registration, "registering service");

        self.store.register_service(registration).await
    }

    pub async fn deregister_service(
        &self,
        id: &str,
    ) -> Result<()> {
        self.store.deregister_service(id).await
    }

    /// Healthy instances of `service`, optionally narrowed to `tag` (empty
    /// means any).
    ///
    /// # Errors
    /// - [`ServiceError::ServiceNotFound`] when no instance passes its checks
    #[cfg_attr(not(doc), autometrics(objective = API_SLO))]
    pub async fn get_services(
        &self,
        service: &str,
        tag: &str,
    ) -> Result<(Vec<ServiceEntry>, QueryMeta)> {
        let (instances, meta) = self.store.healthy_instances(service, tag).await?;
        if instances.is_empty() {
            return Err(service_not_found(service));
        }
        Ok((instances, meta))
    }

    /// First healthy instance of `service`
    ///
    /// # Errors
    /// - [`ServiceError::ServiceNotFound`] when no instance passes its checks
    pub async fn get_first_service(
        &self,
        service: &str,
        tag: &str,
    ) -> Result<(ServiceEntry, QueryMeta)> {
        let (instances, meta) = self.store.healthy_instances(service, tag).await?;
        let Some(first) = instances.into_iter().next() else {
            return Err(service_not_found(service));
        };
        Ok((first, meta))
    }
}

fn service_not_found(service: &str) -> crate::Error {
    ServiceError::ServiceNotFound {
        service: service.to_string(),
    }
    .into()
}
