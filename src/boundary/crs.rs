//! Coordinate reference systems and boundary reprojection.
//!
//! Definitions are handed to PROJ as-is (`EPSG:` codes, WKT1, ESRI WKT or
//! WKT2), and PROJ decides whether it understands them.

use geo::{MapCoords, MultiPolygon};
use proj::Proj;
use std::fmt;

use super::BoundaryError;

/// Geographic lon/lat on WGS 84, the GeoJSON default
pub const WGS84: &str = "EPSG:4326";

/// A reference system definition PROJ has accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crs {
    definition: String,
}

impl Crs {
    pub fn wgs84() -> Self {
        Self {
            definition: WGS84.to_string(),
        }
    }

    pub fn from_epsg(code: u32) -> Self {
        Self {
            definition: format!("EPSG:{}", code),
        }
    }

    /// Parse the contents of a `.prj` sidecar.
    ///
    /// An empty file means WGS 84. Anything else must be a definition PROJ
    /// can transform to WGS 84, otherwise it is `UnsupportedCrs`.
    pub fn from_wkt(wkt: &str) -> Result<Self, BoundaryError> {
        let wkt = wkt.trim();
        if wkt.is_empty() {
            return Ok(Self::wgs84());
        }

        Proj::new_known_crs(wkt, WGS84, None)
            .map_err(|e| BoundaryError::UnsupportedCrs(format!("{}: {}", truncate(wkt), e)))?;

        Ok(Self {
            definition: wkt.to_string(),
        })
    }

    pub fn definition(&self) -> &str {
        &self.definition
    }

    pub fn is_wgs84(&self) -> bool {
        self.definition == WGS84
    }

    /// Transform geometry from `self` into `target`.
    ///
    /// Output axis order is always x = easting/longitude, y = northing/latitude.
    pub fn reproject(
        &self,
        target: &Crs,
        geometry: &MultiPolygon<f64>,
    ) -> Result<MultiPolygon<f64>, BoundaryError> {
        if self == target {
            return Ok(geometry.clone());
        }

        let transform = Proj::new_known_crs(&self.definition, &target.definition, None)
            .map_err(|e| BoundaryError::UnsupportedCrs(format!("{} -> {}: {}", self, target, e)))?;

        Ok(geometry.try_map_coords(|c| transform.convert(c))?)
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", truncate(&self.definition))
    }
}

fn truncate(s: &str) -> String {
    s.chars().take(60).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Area, Polygon};

    const WGS84_PRJ: &str = r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]]"#;

    const ESRI_WEB_MERCATOR_PRJ: &str = r#"PROJCS["WGS_1984_Web_Mercator_Auxiliary_Sphere",GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]],PROJECTION["Mercator_Auxiliary_Sphere"],PARAMETER["False_Easting",0.0],PARAMETER["False_Northing",0.0],PARAMETER["Central_Meridian",0.0],PARAMETER["Standard_Parallel_1",0.0],PARAMETER["Auxiliary_Sphere_Type",0.0],UNIT["Meter",1.0]]"#;

    // Projected system without an AUTHORITY of its own: only the nested
    // GEOGCS carries EPSG:4326
    const UTM_36S_PRJ: &str = r#"PROJCS["WGS 84 / UTM zone 36S",GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],PRIMEM["Greenwich",0,AUTHORITY["EPSG","8901"]],UNIT["degree",0.0174532925199433,AUTHORITY["EPSG","9122"]],AUTHORITY["EPSG","4326"]],PROJECTION["Transverse_Mercator"],PARAMETER["latitude_of_origin",0],PARAMETER["central_meridian",33],PARAMETER["scale_factor",0.9996],PARAMETER["false_easting",500000],PARAMETER["false_northing",10000000],UNIT["metre",1,AUTHORITY["EPSG","9001"]]]"#;

    const ARC_1960_PRJ: &str = r#"GEOGCS["GCS_Arc_1960",DATUM["D_Arc_1960",SPHEROID["Clarke_1880_RGS",6378249.145,293.465]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]]"#;

    fn square(x: f64, y: f64, size: f64) -> MultiPolygon<f64> {
        let square: Polygon<f64> = polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
            (x: x, y: y),
        ];
        MultiPolygon::new(vec![square])
    }

    fn first_coord(geometry: &MultiPolygon<f64>) -> (f64, f64) {
        let c = geometry.0[0].exterior().0[0];
        (c.x, c.y)
    }

    #[test]
    fn test_empty_prj_is_wgs84() {
        assert!(Crs::from_wkt("  \n").unwrap().is_wgs84());
    }

    #[test]
    fn test_esri_wgs84_keeps_coordinates() {
        let crs = Crs::from_wkt(WGS84_PRJ).unwrap();
        let reprojected = crs.reproject(&Crs::wgs84(), &square(36.0, -2.0, 1.0)).unwrap();

        let (x, y) = first_coord(&reprojected);
        assert!((x - 36.0).abs() < 1e-9);
        assert!((y + 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_esri_web_mercator_to_wgs84() {
        let crs = Crs::from_wkt(ESRI_WEB_MERCATOR_PRJ).unwrap();
        let reprojected = crs
            .reproject(&Crs::wgs84(), &square(3_339_584.723_798_207, 0.0, 1000.0))
            .unwrap();

        let (x, y) = first_coord(&reprojected);
        assert!((x - 30.0).abs() < 1e-6);
        assert!(y.abs() < 1e-6);
    }

    #[test]
    fn test_projected_without_outer_authority_is_projected() {
        let crs = Crs::from_wkt(UTM_36S_PRJ).unwrap();
        assert!(!crs.is_wgs84());

        let reprojected = crs
            .reproject(&Crs::wgs84(), &square(500_000.0, 10_000_000.0, 1000.0))
            .unwrap();

        let (x, y) = first_coord(&reprojected);
        assert!((x - 33.0).abs() < 1e-6);
        assert!(y.abs() < 1e-6);
    }

    #[test]
    fn test_regional_datum_is_accepted() {
        let crs = Crs::from_wkt(ARC_1960_PRJ).unwrap();
        let reprojected = crs.reproject(&Crs::wgs84(), &square(37.0, -1.0, 0.5)).unwrap();

        // Datum shift between Arc 1960 and WGS 84 is a few hundred metres
        let (x, y) = first_coord(&reprojected);
        assert!((x - 37.0).abs() < 0.01);
        assert!((y + 1.0).abs() < 0.01);
    }

    #[test]
    fn test_garbage_prj_is_unsupported() {
        assert!(matches!(
            Crs::from_wkt("this is not a coordinate system"),
            Err(BoundaryError::UnsupportedCrs(_))
        ));
    }

    #[test]
    fn test_web_mercator_round_trip() {
        let original = square(30.0, -25.0, 2.0);
        let mercator = Crs::from_epsg(3857);

        let projected = Crs::wgs84().reproject(&mercator, &original).unwrap();
        let (x, _) = first_coord(&projected);
        assert!((x - 3_339_584.72).abs() < 1.0);

        let back = mercator.reproject(&Crs::wgs84(), &projected).unwrap();
        for (a, b) in original.0[0]
            .exterior()
            .coords()
            .zip(back.0[0].exterior().coords())
        {
            assert!((a.x - b.x).abs() < 1e-9);
            assert!((a.y - b.y).abs() < 1e-9);
        }
        assert!((original.unsigned_area() - back.unsigned_area()).abs() < 1e-9);
    }
}
