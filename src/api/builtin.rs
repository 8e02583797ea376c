//! Webmetrics v2 method catalogue.

// self
use crate::{
	api::{MethodDescriptor, MethodTable},
	http::HttpVerb,
};

macro_rules! def_table {
	(
		$(
			$category:literal {
				$( $name:literal => [$($param:literal),* $(,)?] $(as $alias:literal)? ),* $(,)?
			}
		)*
	) => {
		/// Builds the catalogue; entries are checked by the module tests rather than at runtime.
		pub(super) fn table() -> MethodTable {
			let mut table = MethodTable::new();

			$($(
				table.insert(MethodDescriptor {
					category: $category.into(),
					name: $name.into(),
					http_verb: HttpVerb::Get,
					required: vec![$($param.into()),*],
				});
				$( table.insert_alias($category, $alias.into(), $name); )?
			)*)*

			table
		}
	};
}

def_table! {
	"maintenance" {
		"getServices" => [],
		"getServiceType" => ["serviceid"],
		"getNodepad" => [],
		"setNodepad" => ["notepad"],
		"addNewService" => ["servicename", "servicetype"],
		"changePassword" => ["newpassword"],
		"renameService" => ["newname", "serviceid"],
		"resetService" => ["serviceid"],
		"getServiceStatus" => ["serviceid"],
		"turnServiceOff" => ["serviceid"],
		"turnServiceOn" => ["serviceid"],
		"getDescription" => ["serviceid"],
		"setDescription" => ["serviceid", "description"],
		"getMonitoringURL" => ["serviceid"],
		"setMonitoringURL" => ["serviceid", "url"],
		"getPageTimeout" => ["serviceid"],
		"setPageTimeout" => ["serviceid", "timeout"],
		"getMonitoringInterval" => ["serviceid"],
		"setMonitoringInterval" => ["serviceid", "interval"],
		"getAvailableMonitoringIntervals" => ["serviceid"],
		"getScript" => ["serviceid"],
		"addAlertingGroup" => ["group"],
		"getAlertingGroups" => [],
		"removeAlertingGroup" => ["group"],
		"addContactsToAlertingGroup" => ["group", "contact"],
		"getAlertingGroupContacts" => ["group"],
		"removeContactsFromAlertingGroup" => ["group", "contact"],
		"addDiagnosticContacts" => ["serviceid", "contact"],
		"getDiagnosticContacts" => ["serviceid"],
		"setDiagnosticContacts" => ["serviceid", "contact"],
		"removeDiagnosticContact" => ["serviceid", "contact"],
		"addEscalationLevelContacts" => ["serviceid", "contact", "level"],
		"getEscalationLevelContacts" => ["serviceid", "level"],
		"setEscalationLevelContacts" => ["serviceid", "contact", "level"],
		"removeEscalationLevelContact" => ["serviceid", "contact", "level"],
		"getAllAlertingContacts" => ["serviceid"],
		"getEscalationLevelDelay" => ["serviceid", "level"],
		"getEscalationLevelDelayOptions" => [],
		"setEscalationLevelDelay" => ["serviceid", "level", "delay"],
		"getReportList" => [],
		"addReportingContacts" => ["contact", "reportid"],
		"getReportingContacts" => ["reportid"],
		"removeReportingContact" => ["contact", "reportid"],
		"setReportingContacts" => ["contact", "reportid"],
		"addSMSVoiceContact" => ["type", "name", "number"],
		"getSMSVoiceContacts" => [],
		"removeSMSVoiceContact" => ["uid"],
		"getLoadtimeSLA" => ["serviceid"],
		"getUptimeSLA" => ["serviceid"],
		"setLoadtimeSLA" => ["serviceid", "sla"],
		"setUptimeSLA" => ["serviceid", "sla"],
		"getMaintenanceWindows" => ["serviceid"],
		"addOneTimeMaintenanceWindow" => [
			"serviceid", "stime", "sday", "smonth", "syear", "etime", "eday", "emonth", "eyear",
		],
		"addWeeklyMaintenanceWindow" => ["serviceid", "wintype", "stime", "etime"],
		"addMonthlyMaintenanceWindow" => ["serviceid", "wintype", "stime", "etime"],
		"isInMaintenanceWindow" => ["serviceid"],
		"removemaintenanceWindow" => ["id", "serviceid"],
	}
	"realtime" {
		"getdata" => [] as "getData",
	}
	"processeddata" {
		"getdata" => ["serviceid", "sday", "smonth", "syear", "eday", "emonth", "eyear"] as "getData",
	}
	"logdownload" {
		"getdata" => ["serviceid", "day", "month", "year"] as "getData",
	}
	"snapshot" {
		"getdata" => [] as "getData",
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn every_builtin_descriptor_passes_validation() {
		let table = table();

		assert_eq!(table.len(), 61);

		for descriptor in table.iter() {
			descriptor.validate().unwrap_or_else(|e| {
				panic!("Built-in descriptor {} is invalid: {e}.", descriptor.remote_method())
			});
			assert_eq!(descriptor.http_verb, HttpVerb::Get);
		}
	}

	#[test]
	fn getdata_aliases_resolve_to_the_canonical_descriptor() {
		let table = table();

		for category in ["realtime", "processeddata", "logdownload", "snapshot"] {
			let canonical = table.get(category, "getdata").expect("getdata should exist.");
			let alias = table.get(category, "getData").expect("getData alias should exist.");

			assert!(std::ptr::eq(canonical, alias));
			assert_eq!(canonical.remote_method(), format!("{category}.getdata"));
		}

		assert!(table.get("maintenance", "getdata").is_none());
	}

	#[test]
	fn builtin_contracts_match_the_catalogue() {
		let table = table();
		let services = table.get("maintenance", "getServices").expect("getServices should exist.");
		let window = table
			.get("maintenance", "addOneTimeMaintenanceWindow")
			.expect("addOneTimeMaintenanceWindow should exist.");

		assert!(!services.requires_params());
		assert_eq!(window.required.len(), 9);
		assert_eq!(window.required.first().map(String::as_str), Some("serviceid"));
		assert!(!table.get("snapshot", "getData").expect("snapshot alias").requires_params());
	}
}
