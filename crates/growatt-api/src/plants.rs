// Plant endpoints
//
// The plant list is scoped to the logged-in account (`userId`); single
// plant lookup and weather are scoped by `plantId`.

use tracing::debug;

use crate::client::GrowattClient;
use crate::error::Error;
use crate::models::{Plant, Weather};

impl GrowattClient {
    /// List all plants visible to the authenticated account.
    ///
    /// `GET /PlantListAPI.do?userId={id}`
    pub async fn list_plants(&self) -> Result<Vec<Plant>, Error> {
        let user_id = self.require_user_id()?;
        debug!(%user_id, "listing plants");
        let plants: Option<Vec<Plant>> = self
            .get("PlantListAPI.do", &[("userId", user_id)])
            .await?;
        Ok(plants.unwrap_or_default())
    }

    /// Look up a single plant.
    ///
    /// `GET /newTwoPlantAPI.do?op=getPlant&plantId={id}`
    ///
    /// Returns `Ok(None)` when the server has no record for the id.
    pub async fn get_plant(&self, plant_id: &str) -> Result<Option<Plant>, Error> {
        debug!(plant_id, "fetching plant");
        self.get(
            "newTwoPlantAPI.do",
            &[("op", "getPlant".to_owned()), ("plantId", plant_id.to_owned())],
        )
        .await
    }

    /// Current weather at the plant location.
    ///
    /// `GET /newPlantAPI.do?op=getWeather&plantId={id}`
    pub async fn get_weather(&self, plant_id: &str) -> Result<Option<Weather>, Error> {
        debug!(plant_id, "fetching weather");
        self.get(
            "newPlantAPI.do",
            &[("op", "getWeather".to_owned()), ("plantId", plant_id.to_owned())],
        )
        .await
    }
}
