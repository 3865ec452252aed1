//! Recipe payload
//!
//! A fixed XML template consumed by the downstream reporting tool, opaque
//! to this engine beyond three substituted parameters. The `&quot;`
//! entities are part of the template; the consumer unescapes them itself.

/// Build the recipe string for the trailing recipe data object
pub fn construct_recipe(report_template: &str, report_name: &str, project_name: &str) -> String {
    [
        "<Recipe><Name>Report Starter</Name>",
        "<ApplyTemplate href=&quot;rcodes/apply_report_template_to_data.",
        "xsl&quot; enabled=&quot;true&quot;>",
        "<param><name>generatePDF</name><value>true</value></param>",
        "<param><name>reportTemplate</name><value>",
        report_template,
        "</value></param>",
        "<param><name>reportName</name><value>",
        report_name,
        "</value></param>",
        "<param><name>reportID</name><value /></param>",
        "<param><name>d</name><value /></param>",
        "<param><name>mapping</name><value /></param>",
        "<param><name>index</name><value>",
        project_name,
        "</value></param>",
        "<param><name>field</name><value>payload.*</value></param>",
        "<param><name>filter</name><value><filters>",
        "<filter><field>metaData.dataset_id</field><name>Dataset Id</name><filterType>MultiSelect</filterType><filterOperator /><filterUnit />",
        "<filterValues><filterValue>$dataset_id$</filterValue></filterValues></filter>",
        "<filter><field>metaData.data_object_type</field><name>Data Object Type</name><filterType>MultiSelect</filterType><filterOperator /><filterUnit />",
        "<filterValues><filterValue>value</filterValue></filterValues></filter></filters></value></param>",
        "<param><name>grouping</name><value /></param>",
        "<param><name>query</name><value>{      &quot;query&quot",
        ";:{      &quot;bool&quot;: {      &quot;must&quot; :",
        "[            ]      }      }      }</value></param></ApplyTemplate></Recipe>",
    ]
    .concat()
}
