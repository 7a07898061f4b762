//! zathura's D-Bus interface.
//!
//! Each zathura instance owns the well-known name `org.pwmt.zathura.PID-<pid>`
//! and exports its state as properties on `/org/pwmt/zathura`. Reading
//! `filename` fails while no document is open, which the loop treats as the
//! closed state.

use std::path::PathBuf;
use zbus::blocking::fdo::{DBusProxy, PropertiesProxy};
use zbus::blocking::Connection;
use zbus::names::InterfaceName;
use zbus::zvariant::OwnedValue;
use zathura_presence_core::{DocumentSnapshot, PresenceError, Result, ViewerBus};

const BUS_NAME_PREFIX: &str = "org.pwmt.zathura.PID-";
const OBJECT_PATH: &str = "/org/pwmt/zathura";
const INTERFACE: &str = "org.pwmt.zathura";

const PROPERTY_FILE_NAME: &str = "filename";
// Zero-based on the bus.
const PROPERTY_PAGE_NUMBER: &str = "pagenumber";
const PROPERTY_NUMBER_OF_PAGES: &str = "numberofpages";
const PROPERTY_DOCUMENT_INFO: &str = "documentinfo";

#[derive(Debug, Default)]
pub struct ZathuraBus;

impl ViewerBus for ZathuraBus {
    type Connection = Connection;

    fn connect(&self) -> Result<Connection> {
        Connection::session().map_err(|err| PresenceError::BusConnect(err.to_string()))
    }

    fn is_connected(&self, connection: &Connection) -> bool {
        DBusProxy::new(connection)
            .and_then(|proxy| proxy.get_id().map_err(zbus::Error::from))
            .is_ok()
    }

    fn read_status(&self, connection: &Connection, pid: u32) -> Result<DocumentSnapshot> {
        let destination = bus_name(pid);
        let proxy = PropertiesProxy::builder(connection)
            .destination(destination.as_str())
            .and_then(|builder| builder.path(OBJECT_PATH))
            .and_then(|builder| builder.build())
            .map_err(|err| query_error("proxy", err))?;

        let path: String = read_property(&proxy, PROPERTY_FILE_NAME)?;
        let page_index: u32 = read_property(&proxy, PROPERTY_PAGE_NUMBER)?;
        let total_pages: u32 = read_property(&proxy, PROPERTY_NUMBER_OF_PAGES)?;
        let document_info: String = read_property(&proxy, PROPERTY_DOCUMENT_INFO)?;

        Ok(DocumentSnapshot {
            path: PathBuf::from(path),
            current_page: page_index.saturating_add(1),
            total_pages,
            document_info,
        })
    }
}

fn bus_name(pid: u32) -> String {
    format!("{}{}", BUS_NAME_PREFIX, pid)
}

fn read_property<T>(proxy: &PropertiesProxy<'_>, property: &str) -> Result<T>
where
    T: TryFrom<OwnedValue>,
    T::Error: std::fmt::Display,
{
    let value = proxy
        .get(InterfaceName::from_static_str_unchecked(INTERFACE), property)
        .map_err(|err| query_error(property, err))?;
    T::try_from(value).map_err(|err| query_error(property, err))
}

fn query_error(property: &str, err: impl std::fmt::Display) -> PresenceError {
    PresenceError::BusQuery {
        property: property.to_string(),
        details: err.to_string(),
    }
}
