//! Static description of the SO element tree.
//!
//! Every container element of an SO document is described by an
//! [`ElementSpec`] listing the children it may hold, in schema order. Children
//! are either further containers or one of the leaf objects of the data
//! model (tables, matrices, external file references and scalar leaves).
//! The reader uses this to decide which parser receives a subtree and the
//! writer uses it to emit children in schema order.

use std::fmt;

use super::constants::CT_PREFIX;

/// What kind of object an element is parsed into
#[derive(Clone, Copy)]
pub enum NodeKind {
    /// Container element with its own structure entry
    Element(&'static ElementSpec),
    /// Dataset table (`ds:Definition` + rows or external file)
    Table,
    /// Named numeric matrix (`ct:Matrix`)
    Matrix,
    /// External file reference (`path`, `format`, `delimiter`)
    ExternalFile,
    /// Scalar text leaf
    Leaf,
}

impl fmt::Debug for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Element(spec) => write!(f, "Element({})", spec.name),
            NodeKind::Table => f.write_str("Table"),
            NodeKind::Matrix => f.write_str("Matrix"),
            NodeKind::ExternalFile => f.write_str("ExternalFile"),
            NodeKind::Leaf => f.write_str("Leaf"),
        }
    }
}

/// One allowed child of a container element
#[derive(Debug, Clone, Copy)]
pub struct ChildSpec {
    /// Local element name
    pub name: &'static str,
    /// Namespace prefix used when writing
    pub prefix: Option<&'static str>,
    /// Object the element is parsed into
    pub kind: NodeKind,
    /// Whether the child may occur more than once
    pub repeated: bool,
}

impl ChildSpec {
    const fn new(name: &'static str, kind: NodeKind) -> Self {
        Self {
            name,
            prefix: None,
            kind,
            repeated: false,
        }
    }

    const fn many(self) -> Self {
        Self {
            repeated: true,
            ..self
        }
    }

    const fn ct(self) -> Self {
        Self {
            prefix: Some(CT_PREFIX),
            ..self
        }
    }

    /// Element name including the namespace prefix, as written
    pub fn qualified_name(&self) -> String {
        match self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.name),
            None => self.name.to_string(),
        }
    }
}

/// Structure entry of a container element
pub struct ElementSpec {
    /// Local element name
    pub name: &'static str,
    /// Attributes the element may carry
    pub attributes: &'static [&'static str],
    /// Allowed children in schema order
    pub children: &'static [ChildSpec],
}

impl ElementSpec {
    /// Find an allowed child by local name, with its position in schema order
    pub fn child(&self, name: &str) -> Option<(usize, &'static ChildSpec)> {
        self.children
            .iter()
            .enumerate()
            .find(|(_, c)| c.name == name)
    }

    /// Whether `name` is a declared attribute of this element
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains(&name)
    }
}

impl fmt::Debug for ElementSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementSpec({})", self.name)
    }
}

impl PartialEq for ElementSpec {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

const fn element(name: &'static str, spec: &'static ElementSpec) -> ChildSpec {
    ChildSpec::new(name, NodeKind::Element(spec))
}

const fn table(name: &'static str) -> ChildSpec {
    ChildSpec::new(name, NodeKind::Table)
}

const fn matrix(name: &'static str) -> ChildSpec {
    ChildSpec::new(name, NodeKind::Matrix)
}

const fn external_file(name: &'static str) -> ChildSpec {
    ChildSpec::new(name, NodeKind::ExternalFile)
}

const fn leaf(name: &'static str) -> ChildSpec {
    ChildSpec::new(name, NodeKind::Leaf)
}

/// Root element
pub static SO: ElementSpec = ElementSpec {
    name: "SO",
    attributes: &[
        "implementedBy",
        "writtenVersion",
        "id",
        "metadataFile",
    ],
    children: &[
        element("PharmMLRef", &PHARMML_REF),
        element("SOBlock", &SO_BLOCK).many(),
    ],
};

/// Reference to the PharmML model the results belong to
pub static PHARMML_REF: ElementSpec = ElementSpec {
    name: "PharmMLRef",
    attributes: &["name"],
    children: &[],
};

/// Results of one modelling step
pub static SO_BLOCK: ElementSpec = ElementSpec {
    name: "SOBlock",
    attributes: &["blkId"],
    children: &[
        element("ToolSettings", &TOOL_SETTINGS),
        element("RawResults", &RAW_RESULTS),
        element("TaskInformation", &TASK_INFORMATION),
        element("Estimation", &ESTIMATION),
        element("Simulation", &SIMULATION),
        element("ModelDiagnostic", &MODEL_DIAGNOSTIC),
        element("OptimalDesign", &OPTIMAL_DESIGN),
    ],
};

static TOOL_SETTINGS: ElementSpec = ElementSpec {
    name: "ToolSettings",
    attributes: &[],
    children: &[external_file("File").many()],
};

static RAW_RESULTS: ElementSpec = ElementSpec {
    name: "RawResults",
    attributes: &[],
    children: &[
        external_file("DataFile").many(),
        external_file("GraphicsFile").many(),
    ],
};

static TASK_INFORMATION: ElementSpec = ElementSpec {
    name: "TaskInformation",
    attributes: &[],
    children: &[
        element("Message", &MESSAGE).many(),
        external_file("OutputFilePath").many(),
        leaf("RunTime"),
        element("NumberChains", &NUMBER_CHAINS),
        element("NumberIterations", &NUMBER_ITERATIONS),
    ],
};

/// Task message (errors, warnings and informational output of the tool)
pub static MESSAGE: ElementSpec = ElementSpec {
    name: "Message",
    attributes: &["type"],
    children: &[
        element("Toolname", &STRING_WRAPPER),
        element("Name", &STRING_WRAPPER),
        element("Content", &STRING_WRAPPER),
        element("Severity", &INT_WRAPPER),
    ],
};

static STRING_WRAPPER: ElementSpec = ElementSpec {
    name: "String",
    attributes: &[],
    children: &[leaf("String").ct()],
};

static INT_WRAPPER: ElementSpec = ElementSpec {
    name: "Int",
    attributes: &[],
    children: &[leaf("Int").ct()],
};

static NUMBER_CHAINS: ElementSpec = ElementSpec {
    name: "NumberChains",
    attributes: &[],
    children: &[leaf("Description").ct(), leaf("Real").ct()],
};

static NUMBER_ITERATIONS: ElementSpec = ElementSpec {
    name: "NumberIterations",
    attributes: &[],
    children: &[leaf("Real").ct()],
};

static ESTIMATION: ElementSpec = ElementSpec {
    name: "Estimation",
    attributes: &[],
    children: &[
        element("PopulationEstimates", &POPULATION_ESTIMATES),
        element("PrecisionPopulationEstimates", &PRECISION_POPULATION_ESTIMATES),
        element("IndividualEstimates", &INDIVIDUAL_ESTIMATES),
        element("Residuals", &RESIDUALS),
        table("Predictions"),
        element("Likelihood", &LIKELIHOOD),
    ],
};

static POPULATION_ESTIMATES: ElementSpec = ElementSpec {
    name: "PopulationEstimates",
    attributes: &[],
    children: &[
        table("MLE"),
        element("Bayesian", &POPULATION_BAYESIAN),
        element("Bootstrap", &BOOTSTRAP),
    ],
};

static BOOTSTRAP: ElementSpec = ElementSpec {
    name: "Bootstrap",
    attributes: &[],
    children: &[table("Mean"), table("Median")],
};

static POPULATION_BAYESIAN: ElementSpec = ElementSpec {
    name: "Bayesian",
    attributes: &[],
    children: &[
        table("PosteriorMean"),
        table("PosteriorMedian"),
        table("PosteriorMode"),
    ],
};

static PRECISION_POPULATION_ESTIMATES: ElementSpec = ElementSpec {
    name: "PrecisionPopulationEstimates",
    attributes: &[],
    children: &[
        element("MLE", &PRECISION_MLE),
        element("Bayesian", &PRECISION_BAYESIAN),
    ],
};

static PRECISION_BAYESIAN: ElementSpec = ElementSpec {
    name: "Bayesian",
    attributes: &[],
    children: &[table("StandardDeviationPosterior"), table("PercentilesCI")],
};

static PRECISION_MLE: ElementSpec = ElementSpec {
    name: "MLE",
    attributes: &[],
    children: &[
        matrix("FIM"),
        matrix("CovarianceMatrix"),
        matrix("CorrelationMatrix"),
        table("StandardError"),
        table("RelativeStandardError"),
        table("AsymptoticCI"),
        leaf("ConditionNumber"),
    ],
};

static INDIVIDUAL_ESTIMATES: ElementSpec = ElementSpec {
    name: "IndividualEstimates",
    attributes: &[],
    children: &[
        element("Estimates", &INDIVIDUAL_ESTIMATES_ESTIMATES),
        element("RandomEffects", &INDIVIDUAL_RANDOM_EFFECTS),
        table("EtaShrinkage"),
    ],
};

static INDIVIDUAL_ESTIMATES_ESTIMATES: ElementSpec = ElementSpec {
    name: "Estimates",
    attributes: &[],
    children: &[
        table("Mean"),
        table("Median"),
        table("Mode"),
        table("Samples"),
    ],
};

static INDIVIDUAL_RANDOM_EFFECTS: ElementSpec = ElementSpec {
    name: "RandomEffects",
    attributes: &[],
    children: &[
        table("EffectMean"),
        table("EffectMedian"),
        table("EffectMode"),
        table("Samples"),
    ],
};

static RESIDUALS: ElementSpec = ElementSpec {
    name: "Residuals",
    attributes: &[],
    children: &[table("ResidualTable"), table("EpsShrinkage")],
};

static LIKELIHOOD: ElementSpec = ElementSpec {
    name: "Likelihood",
    attributes: &[],
    children: &[
        leaf("LogLikelihood"),
        leaf("Deviance"),
        table("IndividualContribtoLL"),
    ],
};

static SIMULATION: ElementSpec = ElementSpec {
    name: "Simulation",
    attributes: &[],
    children: &[element("SimulationBlock", &SIMULATION_BLOCK).many()],
};

/// One simulation replicate
pub static SIMULATION_BLOCK: ElementSpec = ElementSpec {
    name: "SimulationBlock",
    attributes: &["replicate"],
    children: &[
        table("SimulatedProfiles").many(),
        table("IndivParameters").many(),
        table("RandomEffects").many(),
        table("Covariates").many(),
        table("PopulationParameters").many(),
        table("Dosing").many(),
        external_file("RawResultsFile"),
    ],
};

static OPTIMAL_DESIGN: ElementSpec = ElementSpec {
    name: "OptimalDesign",
    attributes: &["type"],
    children: &[element("OptimalDesignBlock", &OPTIMAL_DESIGN_BLOCK).many()],
};

static OPTIMAL_DESIGN_BLOCK: ElementSpec = ElementSpec {
    name: "OptimalDesignBlock",
    attributes: &["blockNumber"],
    children: &[
        matrix("FIM"),
        matrix("CovarianceMatrix"),
        table("ParameterPrecision"),
        table("Criteria"),
        table("Tests"),
        external_file("SimulatedData"),
        external_file("Design"),
    ],
};

static MODEL_DIAGNOSTIC: ElementSpec = ElementSpec {
    name: "ModelDiagnostic",
    attributes: &[],
    children: &[
        element(
            "DiagnosticPlotsStructuralModel",
            &DIAGNOSTIC_PLOTS_STRUCTURAL_MODEL,
        ),
        table("DiagnosticPlotsIndividualParams"),
    ],
};

static DIAGNOSTIC_PLOTS_STRUCTURAL_MODEL: ElementSpec = ElementSpec {
    name: "DiagnosticPlotsStructuralModel",
    attributes: &[],
    children: &[
        element("IndivFits", &INDIV_FITS),
        table("IndivPredictionVsObserv"),
        table("VPC"),
    ],
};

static INDIV_FITS: ElementSpec = ElementSpec {
    name: "IndivFits",
    attributes: &[],
    children: &[table("ObservationTable"), table("PredictionTable")],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_lookup_follows_schema_order() {
        let (idx, child) = SO_BLOCK.child("Estimation").unwrap();
        assert_eq!(idx, 3);
        assert!(matches!(child.kind, NodeKind::Element(spec) if spec.name == "Estimation"));
        assert!(SO_BLOCK.child("Bogus").is_none());
    }

    #[test]
    fn test_same_name_different_kind() {
        let NodeKind::Element(estimation) = SO_BLOCK.child("Estimation").unwrap().1.kind else {
            panic!("Estimation must be a container");
        };
        let NodeKind::Element(pe) = estimation.child("PopulationEstimates").unwrap().1.kind else {
            panic!("PopulationEstimates must be a container");
        };
        let NodeKind::Element(ppe) = estimation
            .child("PrecisionPopulationEstimates")
            .unwrap()
            .1
            .kind
        else {
            panic!("PrecisionPopulationEstimates must be a container");
        };

        assert!(matches!(pe.child("MLE").unwrap().1.kind, NodeKind::Table));
        assert!(matches!(ppe.child("MLE").unwrap().1.kind, NodeKind::Element(_)));
    }

    #[test]
    fn test_qualified_names() {
        let (_, string) = STRING_WRAPPER.child("String").unwrap();
        assert_eq!(string.qualified_name(), "ct:String");
        let (_, block) = SO.child("SOBlock").unwrap();
        assert_eq!(block.qualified_name(), "SOBlock");
        assert!(block.repeated);
    }

    #[test]
    fn test_spec_equality_is_identity() {
        assert_eq!(&SO_BLOCK, &SO_BLOCK);
        assert_ne!(&POPULATION_BAYESIAN, &PRECISION_BAYESIAN);
    }
}
