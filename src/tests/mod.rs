mod ledger_flow_test;
