//! The `VisitsDetails` stream (`Live.getLastVisitsDetails`)

use super::types::StreamDefinition;
use crate::schema::{JsonSchema, JsonType, SchemaProperty};
use std::collections::BTreeMap;

/// Stream name
pub const VISITS_DETAILS: &str = "VisitsDetails";

const INTEGER_FIELDS: &[&str] = &[
    "idSite",
    "idVisit",
    "goalConversions",
    "lastActionTimestamp",
    "serverTimestamp",
    "firstActionTimestamp",
    "visitConverted",
    "visitCount",
    "daysSinceFirstVisit",
    "secondsSinceFirstVisit",
    "daysSinceLastEcommerceOrder",
    "secondsSinceLastEcommerceOrder",
    "visitDuration",
    "searches",
    "actions",
    "interactions",
    "events",
    "daysSinceLastVisit",
    "secondsSinceLastVisit",
    "truncatedActionsCount",
];

const STRING_FIELDS: &[&str] = &[
    "visitIp",
    "visitorId",
    "fingerprint",
    "siteCurrency",
    "siteCurrencySymbol",
    "serverDate",
    "visitServerHour",
    "lastActionDateTime",
    "siteName",
    "serverTimePretty",
    "serverDatePretty",
    "serverDatePrettyFirstAction",
    "serverTimePrettyFirstAction",
    "userId",
    "visitorType",
    "visitorTypeIcon",
    "visitConvertedIcon",
    "visitEcommerceStatus",
    "visitEcommerceStatusIcon",
    "visitDurationPretty",
    "referrerType",
    "referrerTypeName",
    "referrerName",
    "referrerKeyword",
    "referrerKeywordPosition",
    "referrerUrl",
    "referrerSearchEngineUrl",
    "referrerSearchEngineIcon",
    "referrerSocialNetworkUrl",
    "referrerSocialNetworkIcon",
    "languageCode",
    "language",
    "deviceType",
    "deviceTypeIcon",
    "deviceBrand",
    "deviceModel",
    "operatingSystem",
    "operatingSystemName",
    "operatingSystemIcon",
    "operatingSystemCode",
    "operatingSystemVersion",
    "browserFamily",
    "browserFamilyDescription",
    "browser",
    "browserName",
    "browserIcon",
    "browserCode",
    "browserVersion",
    "continent",
    "continentCode",
    "country",
    "countryCode",
    "countryFlag",
    "region",
    "regionCode",
    "city",
    "location",
    "latitude",
    "longitude",
    "visitLocalTime",
    "visitLocalHour",
    "resolution",
    "plugins",
    "dimension1",
    "dimension2",
    "provider",
    "providerName",
    "providerUrl",
];

const ACTION_INTEGER_FIELDS: &[&str] = &[
    "pageIdAction",
    "pageId",
    "timeSpent",
    "pageLoadTimeMilliseconds",
    "pageviewPosition",
    "timestamp",
];

const ACTION_STRING_FIELDS: &[&str] = &[
    "type",
    "url",
    "pageTitle",
    "idpageview",
    "serverTimePretty",
    "pageLoadTime",
    "timeSpentPretty",
    "title",
    "subtitle",
    "icon",
    "iconSVG",
];

const PLUGIN_ICON_FIELDS: &[&str] = &["pluginIcon", "pluginName"];

/// Visit log rows, one per visit
pub fn visits_details() -> StreamDefinition {
    let mut schema = JsonSchema::new();
    for field in INTEGER_FIELDS {
        schema.add_property(field, SchemaProperty::nullable(JsonType::Integer));
    }
    for field in STRING_FIELDS {
        schema.add_property(field, SchemaProperty::nullable(JsonType::String));
    }
    schema.add_property(
        "actionDetails",
        array_of_objects(ACTION_INTEGER_FIELDS, ACTION_STRING_FIELDS),
    );
    schema.add_property("pluginsIcons", array_of_objects(&[], PLUGIN_ICON_FIELDS));

    StreamDefinition::new(VISITS_DETAILS, schema).with_primary_keys(&["idSite", "idVisit"])
}

fn array_of_objects(integers: &[&str], strings: &[&str]) -> SchemaProperty {
    let mut properties = BTreeMap::new();
    for field in integers {
        properties.insert((*field).to_string(), SchemaProperty::nullable(JsonType::Integer));
    }
    for field in strings {
        properties.insert((*field).to_string(), SchemaProperty::nullable(JsonType::String));
    }

    SchemaProperty::array(SchemaProperty::object(properties).into_nullable()).into_nullable()
}
