//! Registry enumerations
//!
//! Variant order is registry order: it drives how sets are emitted in the
//! aggregate and how tokens are listed to contributors.

token_enum! {
    /// Subject covered by a material, also used for prerequisites
    pub enum Subject: "subject" {
        BasicMath => "matemática básica",
        CloudComputing => "computação em nuvem",
        Css => "css",
        DataScience => "ciência de dados",
        Databases => "bancos de dados",
        Devops => "devops",
        Html => "html",
        Javascript => "javascript",
        MachineLearning => "aprendizado de máquina",
        MobileDevelopment => "desenvolvimento mobile",
        ProgrammingBasics => "programação básica",
        Python => "python",
        SoftwareEngineering => "engenharia de software",
        WebDevelopment => "desenvolvimento web",
    }
}

token_enum! {
    /// Medium the material is published in
    pub enum Format: "format" {
        Video => "vídeo",
        BlogPost => "blog post",
        Book => "livro",
        Article => "artigo",
        OnlineCourse => "curso online",
        Podcast => "podcast",
        Tutorial => "tutorial",
        Document => "documento",
    }
}

token_enum! {
    pub enum Language: "language" {
        En => "english",
        PtBr => "português (BR)",
    }
}

token_enum! {
    /// How the material is best absorbed
    pub enum LearningStyle: "learning style" {
        Visual => "visual",
        Auditory => "auditivo",
        Kinesthetic => "cinestésico",
    }
}

token_enum! {
    pub enum Pace: "pace" {
        Fast => "rápido",
        Medium => "médio",
        Slow => "lento",
    }
}

token_enum! {
    pub enum Difficulty: "difficulty" {
        /// No prior knowledge needed
        Beginner => "iniciante",
        Intermediate => "intermediário",
        Advanced => "avançado",
        /// Highly specialized content
        Expert => "expert",
    }
}
