//! Batch driver over a whole roster.

use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::stream;
use indexmap::IndexMap;

use crate::collector::{DeviceCollector, DeviceOutcome, SkipReason};
use crate::config::Inventory;
use crate::dialect::{Dialect, DialectRegistry};
use crate::error::Result;
use crate::logging::Logger;
use crate::model::{BatchResult, DeviceDescriptor, FamilyTable};
use crate::session::Connector;

/// Runs the collector over every device of an inventory.
///
/// Devices are visited in roster order. With `concurrency` above one,
/// several devices are collected at once on separate tasks, but outcomes are
/// still folded into the family tables in roster order by the driver alone.
pub struct BatchDriver<C> {
    collector: Arc<DeviceCollector<C>>,
    registry: DialectRegistry,
    concurrency: usize,
    log: Logger,
}

impl<C: Connector + 'static> BatchDriver<C> {
    /// Create a sequential driver resolving families through `registry`.
    pub fn new(collector: DeviceCollector<C>, registry: DialectRegistry, log: Logger) -> Self {
        Self {
            collector: Arc::new(collector),
            registry,
            concurrency: 1,
            log,
        }
    }

    /// Number of devices collected at the same time (minimum 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// The per-device collector.
    pub fn collector(&self) -> &DeviceCollector<C> {
        &self.collector
    }

    /// Collect the whole inventory.
    ///
    /// Fails only when the inventory does not pass validation, before any
    /// device is contacted. Per-device problems are logged and skipped.
    pub async fn run(&self, inventory: &Inventory) -> Result<BatchResult> {
        inventory.validate()?;

        log::info!(
            logger: self.log,
            "collecting from {} device(s) in {} famil(ies)",
            inventory.device_count(),
            inventory.roster().len()
        );

        let dialects = self.resolve_dialects(inventory);
        let mut tables: IndexMap<String, FamilyTable> = inventory
            .roster()
            .keys()
            .map(|family| (family.clone(), FamilyTable::new()))
            .collect();

        let jobs = inventory.devices().map(|device| {
            let dialect = dialects.get(&device.family).cloned().flatten();
            self.spawn_collect(device, dialect)
        });

        let mut outcomes = stream::iter(jobs).buffered(self.concurrency);
        while let Some((device, outcome)) = outcomes.next().await {
            if let DeviceOutcome::Collected(rows) = outcome {
                if let Some(table) = tables.get_mut(&device.family) {
                    table.extend(rows);
                }
            }
        }

        for (family, table) in &tables {
            log::info!(logger: self.log, "family {}: {} row(s)", family, table.rows().len());
        }

        tables.retain(|_, table| table.has_data());
        Ok(tables)
    }

    fn resolve_dialects(&self, inventory: &Inventory) -> IndexMap<String, Option<Arc<Dialect>>> {
        inventory
            .roster()
            .keys()
            .map(|family| {
                let dialect = self.registry.resolve(family);
                match &dialect {
                    Some(d) => {
                        log::debug!(logger: self.log, "family {} uses dialect {}", family, d.name)
                    }
                    None => log::warn!(
                        logger: self.log,
                        "family {} has no registered dialect, its devices will be skipped",
                        family
                    ),
                }
                (family.clone(), dialect)
            })
            .collect()
    }

    /// Collect one device on its own task so a panic stays with that device.
    async fn spawn_collect(
        &self,
        device: DeviceDescriptor,
        dialect: Option<Arc<Dialect>>,
    ) -> (DeviceDescriptor, DeviceOutcome) {
        log::info!(logger: self.log, "-------------------");
        log::info!(logger: self.log, "DEVICE IP: {}", device.host);

        let Some(dialect) = dialect else {
            let reason = SkipReason::UnknownDialect(device.family.clone());
            log::warn!(logger: self.log, "> {}", reason);
            log::warn!(logger: self.log, "no device info obtained, skipping");
            return (device, DeviceOutcome::Skipped(reason));
        };

        let collector = self.collector.clone();
        let task_device = device.clone();
        let outcome = tokio::spawn(async move { collector.collect(&task_device, dialect).await })
            .await
            .unwrap_or_else(|e| {
                log::error!(
                    logger: self.log,
                    "> collection task for {} failed: {}",
                    device.host,
                    e
                );
                DeviceOutcome::Skipped(SkipReason::Aborted(e.to_string()))
            });

        if !outcome.is_collected() {
            log::warn!(logger: self.log, "no device info obtained, skipping");
        }
        (device, outcome)
    }
}
