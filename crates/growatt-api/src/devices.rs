// Device and fault log endpoints

use tracing::debug;

use crate::client::GrowattClient;
use crate::error::Error;
use crate::models::{Device, DeviceQuery, FaultLog, FaultLogQuery};

impl GrowattClient {
    /// List devices attached to a plant.
    ///
    /// `GET /newTwoPlantAPI.do?op=getAllDeviceList&plantId={id}[&pageNum&pageSize]`
    pub async fn list_devices(&self, query: &DeviceQuery) -> Result<Vec<Device>, Error> {
        debug!(plant_id = %query.plant_id, page = ?query.page, "listing devices");
        let devices: Option<Vec<Device>> =
            self.get("newTwoPlantAPI.do", &query.to_pairs()).await?;
        Ok(devices.unwrap_or_default())
    }

    /// List fault events for a plant.
    ///
    /// `GET /newFaultLogAPI.do?plantId={id}[&deviceSn&date&type&pageNum]`
    pub async fn list_fault_logs(&self, query: &FaultLogQuery) -> Result<Vec<FaultLog>, Error> {
        debug!(plant_id = %query.plant_id, date = ?query.date, "listing fault logs");
        let logs: Option<Vec<FaultLog>> =
            self.get("newFaultLogAPI.do", &query.to_pairs()).await?;
        Ok(logs.unwrap_or_default())
    }
}
