use magento_rest_sdk::HttpMethod;

use crate::domain::registry::{OperationRegistryBuilder, OperationTemplate};

const RESOURCE: &str = "store";

const ENDPOINTS: [(&str, &str); 3] = [
    ("getStoreGroups", "/rest/V1/store/storeGroups"),
    ("getStoreViews", "/rest/V1/store/storeViews"),
    ("getWebsites", "/rest/V1/store/websites"),
];

pub(super) fn register(builder: OperationRegistryBuilder) -> OperationRegistryBuilder {
    ENDPOINTS.iter().fold(builder, |builder, (operation, url)| {
        builder.operation(OperationTemplate::literal(RESOURCE, operation, HttpMethod::Get, url))
    })
}
