mod registry_scenarios;
